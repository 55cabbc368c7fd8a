//! Recommendation synthesis
//!
//! Builds the ordered guidance lists returned with analysis and
//! prediction results. The lists are never empty: a healthy-system
//! message is the fallback when no rule fires.

use crate::models::{AnomalyFinding, FailureRisk, MetricType, Severity};
use std::collections::BTreeSet;

/// Guidance for an anomaly analysis result
pub fn analysis_recommendations(anomalies: &[AnomalyFinding], overall_risk: f64) -> Vec<String> {
    let mut recommendations = Vec::new();

    if overall_risk > 0.8 {
        recommendations.push("CRITICAL: Immediate attention required - system at high risk".to_string());
    } else if overall_risk > 0.6 {
        recommendations.push("HIGH: System showing concerning patterns - monitor closely".to_string());
    } else if overall_risk > 0.4 {
        recommendations.push("MEDIUM: Some anomalies detected - review system health".to_string());
    }

    if !anomalies.is_empty() {
        recommendations.push(format!("Investigate {} detected anomalies", anomalies.len()));

        let critical = anomalies
            .iter()
            .filter(|a| a.severity == Severity::Critical)
            .count();
        let high = anomalies
            .iter()
            .filter(|a| a.severity == Severity::High)
            .count();

        if critical > 0 {
            recommendations.push(format!("Address {} critical anomalies immediately", critical));
        }
        if high > 0 {
            recommendations.push(format!("Review {} high-severity anomalies", high));
        }
    }

    if recommendations.is_empty() {
        recommendations.push("System appears healthy - continue monitoring".to_string());
    }

    recommendations
}

/// Guidance for a failure prediction result. `component_types` carries
/// the metric types present in the batch, driving type-specific advice.
pub fn prediction_recommendations(
    risks: &[FailureRisk],
    component_types: &BTreeSet<MetricType>,
    overall_risk: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if overall_risk > 0.8 {
        recommendations
            .push("CRITICAL: System at high risk of failure - immediate action required".to_string());
    } else if overall_risk > 0.6 {
        recommendations
            .push("HIGH: System showing failure risk patterns - proactive measures needed".to_string());
    } else if overall_risk > 0.4 {
        recommendations.push("MEDIUM: Some components at risk - monitor and maintain".to_string());
    }

    let critical = risks.iter().filter(|r| r.risk_score > 0.8).count();
    let high = risks
        .iter()
        .filter(|r| r.risk_score > 0.6 && r.risk_score <= 0.8)
        .count();

    if critical > 0 {
        recommendations.push(format!("Address {} critical components immediately", critical));
    }
    if high > 0 {
        recommendations.push(format!("Review {} high-risk components", high));
    }

    if component_types.contains(&MetricType::Cpu) {
        recommendations.push("Consider CPU scaling or load balancing".to_string());
    }
    if component_types.contains(&MetricType::Memory) {
        recommendations.push("Review memory allocation and optimization".to_string());
    }
    if component_types.contains(&MetricType::Disk) {
        recommendations.push("Implement storage monitoring and cleanup".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("System appears healthy - continue regular monitoring".to_string());
    }

    recommendations
}
