//! Core data models for the alerting engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Kind of infrastructure metric under analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricType {
    Cpu,
    Memory,
    Disk,
    Network,
    Custom,
}

impl MetricType {
    /// Wire name, also used for component identifiers ("CPU_cpu_usage")
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Cpu => "CPU",
            MetricType::Memory => "MEMORY",
            MetricType::Disk => "DISK",
            MetricType::Network => "NETWORK",
            MetricType::Custom => "CUSTOM",
        }
    }
}

/// One timestamped metric observation from a host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    pub metric_type: MetricType,
    pub metric_name: String,
    pub metric_value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<HashMap<String, serde_json::Value>>,
}

/// Severity band derived from a normalized anomaly score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// A metric sample flagged as anomalous
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyFinding {
    pub metric_name: String,
    pub metric_value: f64,
    /// Normalized anomaly score in [0, 1], higher = more anomalous
    pub anomaly_score: f64,
    pub severity: Severity,
    pub confidence: f64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Failure risk assessment for a single component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRisk {
    /// Component identifier, "{TYPE}_{metric_name}"
    pub component: String,
    pub risk_score: f64,
    pub confidence: f64,
    /// Estimated hours until the critical threshold is crossed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_failure: Option<u64>,
    pub contributing_factors: Vec<String>,
    pub mitigation_suggestions: Vec<String>,
}

/// Aggregate result of an anomaly analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub anomalies_detected: usize,
    pub anomalies: Vec<AnomalyFinding>,
    pub overall_risk_score: f64,
    pub recommendations: Vec<String>,
}

/// Aggregate result of a failure prediction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Hours ahead the prediction covers
    pub prediction_horizon: u32,
    pub overall_risk_score: f64,
    pub high_risk_components: usize,
    pub failure_risks: Vec<FailureRisk>,
    pub system_health_score: f64,
    pub recommendations: Vec<String>,
}

/// Engine health snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub model_fitted: bool,
    pub uptime_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_type_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&MetricType::Cpu).unwrap(), "\"CPU\"");
        assert_eq!(
            serde_json::to_string(&MetricType::Network).unwrap(),
            "\"NETWORK\""
        );
        let parsed: MetricType = serde_json::from_str("\"DISK\"").unwrap();
        assert_eq!(parsed, MetricType::Disk);
    }

    #[test]
    fn test_severity_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"CRITICAL\""
        );
        let parsed: Severity = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }

    #[test]
    fn test_metric_sample_round_trip() {
        let json = r#"{
            "metric_type": "MEMORY",
            "metric_name": "mem_used_percent",
            "metric_value": 72.5,
            "unit": "%",
            "timestamp": "2024-03-01T10:30:00Z",
            "host": "web-01",
            "additional_data": {"region": "eu-west-1"}
        }"#;
        let sample: MetricSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.metric_type, MetricType::Memory);
        assert_eq!(sample.host, "web-01");
        assert!(sample.additional_data.is_some());

        let back = serde_json::to_value(&sample).unwrap();
        assert_eq!(back["metric_type"], "MEMORY");
        assert_eq!(back["metric_value"], 72.5);
    }

    #[test]
    fn test_additional_data_is_optional() {
        let json = r#"{
            "metric_type": "CPU",
            "metric_name": "cpu_usage",
            "metric_value": 55.0,
            "unit": "%",
            "timestamp": "2024-03-01T10:30:00Z",
            "host": "web-01"
        }"#;
        let sample: MetricSample = serde_json::from_str(json).unwrap();
        assert!(sample.additional_data.is_none());
    }
}
