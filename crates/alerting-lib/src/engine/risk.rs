//! Component failure-risk scoring
//!
//! Maps a sample's raw value against component-specific high/critical
//! thresholds into a risk score, and derives prediction confidence,
//! contributing factors, and mitigation suggestions per component.

use crate::models::{MetricSample, MetricType};

/// High/critical threshold pair for one component type
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub high: f64,
    pub critical: f64,
}

/// Failure thresholds keyed by metric type, with a fallback for
/// custom/unknown types
#[derive(Debug, Clone)]
pub struct ThresholdTable {
    pub cpu: Thresholds,
    pub memory: Thresholds,
    pub disk: Thresholds,
    pub network: Thresholds,
    pub fallback: Thresholds,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            cpu: Thresholds {
                high: 85.0,
                critical: 95.0,
            },
            memory: Thresholds {
                high: 80.0,
                critical: 90.0,
            },
            disk: Thresholds {
                high: 85.0,
                critical: 95.0,
            },
            network: Thresholds {
                high: 80.0,
                critical: 90.0,
            },
            fallback: Thresholds {
                high: 80.0,
                critical: 90.0,
            },
        }
    }
}

impl ThresholdTable {
    pub fn for_type(&self, metric_type: MetricType) -> Thresholds {
        match metric_type {
            MetricType::Cpu => self.cpu,
            MetricType::Memory => self.memory,
            MetricType::Disk => self.disk,
            MetricType::Network => self.network,
            MetricType::Custom => self.fallback,
        }
    }
}

/// Piecewise-linear risk score for a value against its thresholds.
///
/// Unbounded above 1.0 for extreme critical overshoot; floored at 0.1 so
/// no component is ever reported as zero risk.
pub fn component_risk(value: f64, thresholds: Thresholds) -> f64 {
    let Thresholds { high, critical } = thresholds;
    if value >= critical {
        0.9 + (value - critical) / 100.0
    } else if value >= high {
        0.6 + (value - high) / (critical - high) * 0.3
    } else if value >= high * 0.8 {
        0.3 + (value - high * 0.8) / (high * 0.2) * 0.3
    } else {
        (value / high * 0.3).max(0.1)
    }
}

/// Prediction confidence grows with the amount of matching history
/// (same metric name and host), from 0.5 with none up to 0.9.
pub fn prediction_confidence(sample: &MetricSample, historical: Option<&[MetricSample]>) -> f64 {
    let Some(history) = historical else {
        return 0.5;
    };
    let matching = history
        .iter()
        .filter(|h| h.metric_name == sample.metric_name && h.host == sample.host)
        .count();
    (0.5 + matching as f64 * 0.02).min(0.9)
}

/// Factors contributing to a component's failure risk
pub fn contributing_factors(metric_type: MetricType, risk_score: f64) -> Vec<String> {
    let mut factors = Vec::new();

    if risk_score > 0.8 {
        factors.push("Critical threshold exceeded".to_string());
    } else if risk_score > 0.6 {
        factors.push("High resource utilization".to_string());
    }

    match metric_type {
        MetricType::Cpu => factors.push("High CPU load detected".to_string()),
        MetricType::Memory => factors.push("Memory pressure detected".to_string()),
        MetricType::Disk => factors.push("Disk space pressure detected".to_string()),
        MetricType::Network => factors.push("Network congestion detected".to_string()),
        MetricType::Custom => {}
    }

    factors
}

/// Mitigation suggestions for a component, ordered most urgent first
pub fn mitigation_suggestions(metric_type: MetricType, risk_score: f64) -> Vec<String> {
    let suggestions: &[&str] = match metric_type {
        MetricType::Cpu if risk_score > 0.8 => &[
            "Immediately scale up CPU resources",
            "Check for runaway processes",
            "Consider load balancing",
        ],
        MetricType::Cpu if risk_score > 0.6 => &[
            "Monitor CPU usage trends",
            "Optimize application performance",
            "Consider resource scaling",
        ],
        MetricType::Memory if risk_score > 0.8 => &[
            "Immediately increase memory allocation",
            "Check for memory leaks",
            "Restart memory-intensive services",
        ],
        MetricType::Memory if risk_score > 0.6 => &[
            "Monitor memory usage patterns",
            "Optimize memory-intensive applications",
            "Consider memory upgrade",
        ],
        MetricType::Disk if risk_score > 0.8 => &[
            "Immediately free up disk space",
            "Remove unnecessary files",
            "Consider disk expansion",
        ],
        MetricType::Disk if risk_score > 0.6 => &[
            "Monitor disk usage trends",
            "Implement log rotation",
            "Consider storage optimization",
        ],
        _ => &[],
    };
    suggestions.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cpu_thresholds() -> Thresholds {
        ThresholdTable::default().for_type(MetricType::Cpu)
    }

    fn sample(name: &str, host: &str) -> MetricSample {
        MetricSample {
            metric_type: MetricType::Cpu,
            metric_name: name.to_string(),
            metric_value: 50.0,
            unit: "%".to_string(),
            timestamp: Utc::now(),
            host: host.to_string(),
            additional_data: None,
        }
    }

    #[test]
    fn test_threshold_table_defaults() {
        let table = ThresholdTable::default();
        assert_eq!(table.for_type(MetricType::Cpu).high, 85.0);
        assert_eq!(table.for_type(MetricType::Cpu).critical, 95.0);
        assert_eq!(table.for_type(MetricType::Memory).high, 80.0);
        assert_eq!(table.for_type(MetricType::Disk).critical, 95.0);
        assert_eq!(table.for_type(MetricType::Network).critical, 90.0);
        assert_eq!(table.for_type(MetricType::Custom).high, 80.0);
        assert_eq!(table.for_type(MetricType::Custom).critical, 90.0);
    }

    #[test]
    fn test_risk_above_critical() {
        // 96 against {85, 95}: 0.9 + 1/100
        let risk = component_risk(96.0, cpu_thresholds());
        assert!((risk - 0.91).abs() < 1e-9);
    }

    #[test]
    fn test_risk_unclamped_for_extreme_overshoot() {
        let risk = component_risk(110.0, cpu_thresholds());
        assert!(risk > 1.0);
    }

    #[test]
    fn test_risk_high_band_interpolation() {
        let t = cpu_thresholds();
        assert!((component_risk(85.0, t) - 0.6).abs() < 1e-9);
        assert!((component_risk(90.0, t) - 0.75).abs() < 1e-9);
        assert!(component_risk(94.9, t) < 0.9);
    }

    #[test]
    fn test_risk_warning_band_interpolation() {
        let t = cpu_thresholds();
        // 0.8 * 85 = 68
        assert!((component_risk(68.0, t) - 0.3).abs() < 1e-9);
        assert!((component_risk(76.5, t) - 0.45).abs() < 1e-9);
        assert!(component_risk(84.9, t) < 0.6);
    }

    #[test]
    fn test_risk_floor() {
        let t = cpu_thresholds();
        assert_eq!(component_risk(0.0, t), 0.1);
        assert_eq!(component_risk(5.0, t), 0.1);
        // 60/85 * 0.3 ≈ 0.212, above the floor
        assert!(component_risk(60.0, t) > 0.1);
    }

    #[test]
    fn test_risk_monotonic_across_bands() {
        let t = cpu_thresholds();
        let values = [10.0, 40.0, 67.9, 68.0, 80.0, 84.9, 85.0, 90.0, 94.9, 95.0, 99.0, 120.0];
        let mut previous = f64::NEG_INFINITY;
        for value in values {
            let risk = component_risk(value, t);
            assert!(
                risk >= previous,
                "risk decreased at value {}: {} < {}",
                value,
                risk,
                previous
            );
            previous = risk;
        }
    }

    #[test]
    fn test_confidence_without_history() {
        assert_eq!(prediction_confidence(&sample("cpu_usage", "h1"), None), 0.5);
    }

    #[test]
    fn test_confidence_counts_matching_history() {
        let current = sample("cpu_usage", "h1");
        let history: Vec<MetricSample> = (0..5)
            .map(|_| sample("cpu_usage", "h1"))
            .chain((0..3).map(|_| sample("cpu_usage", "h2")))
            .chain((0..2).map(|_| sample("disk_usage", "h1")))
            .collect();
        // Only the 5 name+host matches count: 0.5 + 5 * 0.02
        let confidence = prediction_confidence(&current, Some(&history));
        assert!((confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_capped() {
        let current = sample("cpu_usage", "h1");
        let history: Vec<MetricSample> = (0..50).map(|_| sample("cpu_usage", "h1")).collect();
        assert_eq!(prediction_confidence(&current, Some(&history)), 0.9);
    }

    #[test]
    fn test_contributing_factors_bands() {
        let factors = contributing_factors(MetricType::Cpu, 0.85);
        assert_eq!(
            factors,
            vec!["Critical threshold exceeded", "High CPU load detected"]
        );

        let factors = contributing_factors(MetricType::Memory, 0.65);
        assert_eq!(
            factors,
            vec!["High resource utilization", "Memory pressure detected"]
        );

        let factors = contributing_factors(MetricType::Disk, 0.3);
        assert_eq!(factors, vec!["Disk space pressure detected"]);
    }

    #[test]
    fn test_contributing_factors_custom_default_arm() {
        assert!(contributing_factors(MetricType::Custom, 0.3).is_empty());
        assert_eq!(
            contributing_factors(MetricType::Custom, 0.9),
            vec!["Critical threshold exceeded"]
        );
    }

    #[test]
    fn test_mitigation_suggestions_by_band() {
        let urgent = mitigation_suggestions(MetricType::Memory, 0.9);
        assert_eq!(urgent[0], "Immediately increase memory allocation");
        assert_eq!(urgent.len(), 3);

        let watchful = mitigation_suggestions(MetricType::Memory, 0.7);
        assert_eq!(watchful[0], "Monitor memory usage patterns");

        assert!(mitigation_suggestions(MetricType::Memory, 0.5).is_empty());
        assert!(mitigation_suggestions(MetricType::Network, 0.9).is_empty());
        assert!(mitigation_suggestions(MetricType::Custom, 0.9).is_empty());
    }
}
