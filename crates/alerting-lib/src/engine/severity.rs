//! Severity and confidence derivation for anomaly findings

use crate::models::{MetricSample, MetricType, Severity};

/// Map a normalized anomaly score to its severity band, highest first
pub fn classify(score: f64) -> Severity {
    if score >= 0.9 {
        Severity::Critical
    } else if score >= 0.7 {
        Severity::High
    } else if score >= 0.5 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Detection confidence: the score with a fixed boost, capped at 1.0
pub fn confidence(score: f64) -> f64 {
    (score * 1.2).min(1.0)
}

/// Human-readable description for a flagged sample
pub fn describe(sample: &MetricSample, score: f64) -> String {
    let severity = classify(score);
    match sample.metric_type {
        MetricType::Cpu => format!(
            "{} CPU usage anomaly detected: {}{}",
            severity.as_str(),
            sample.metric_value,
            sample.unit
        ),
        MetricType::Memory => format!(
            "{} Memory usage anomaly detected: {}{}",
            severity.as_str(),
            sample.metric_value,
            sample.unit
        ),
        MetricType::Disk => format!(
            "{} Disk usage anomaly detected: {}{}",
            severity.as_str(),
            sample.metric_value,
            sample.unit
        ),
        MetricType::Network => format!(
            "{} Network activity anomaly detected: {}{}",
            severity.as_str(),
            sample.metric_value,
            sample.unit
        ),
        MetricType::Custom => format!(
            "{} Custom metric anomaly detected: {} = {}{}",
            severity.as_str(),
            sample.metric_name,
            sample.metric_value,
            sample.unit
        ),
    }
}
