//! Time-to-failure estimation via linear trend extrapolation
//!
//! Fits an ordinary least-squares line of metric value against elapsed
//! hours over the matching history for a sample, and extrapolates when
//! the component's critical threshold will be crossed.

use crate::models::MetricSample;

/// Minimum matching history samples required for an estimate
pub const MIN_HISTORY_SAMPLES: usize = 3;

/// Estimate hours until `sample`'s value reaches `critical`.
///
/// Returns `None` when there is no usable upward trend: fewer than
/// [`MIN_HISTORY_SAMPLES`] matching history points, degenerate duplicate
/// timestamps, or a non-positive slope.
pub fn time_to_critical(
    sample: &MetricSample,
    historical: Option<&[MetricSample]>,
    critical: f64,
) -> Option<u64> {
    let history = historical?;

    let mut matching: Vec<&MetricSample> = history
        .iter()
        .filter(|h| h.metric_name == sample.metric_name && h.host == sample.host)
        .collect();
    if matching.len() < MIN_HISTORY_SAMPLES {
        return None;
    }

    matching.sort_by_key(|h| h.timestamp);
    let earliest = matching[0].timestamp;
    let points: Vec<(f64, f64)> = matching
        .iter()
        .map(|h| {
            let elapsed_hours = (h.timestamp - earliest).num_seconds() as f64 / 3600.0;
            (elapsed_hours, h.metric_value)
        })
        .collect();

    // All observations at the same offset cannot define a slope
    let first_x = points[0].0;
    if points.iter().all(|(x, _)| (*x - first_x).abs() < f64::EPSILON) {
        return None;
    }

    let slope = ols_slope(&points);
    if slope <= 0.0 {
        return None;
    }

    if sample.metric_value >= critical {
        return Some(0);
    }

    let hours = (critical - sample.metric_value) / slope;
    Some(hours.max(0.0) as u64)
}

/// Least-squares slope over (x, y) points
fn ols_slope(points: &[(f64, f64)]) -> f64 {
    let n = points.len() as f64;
    if n < 2.0 {
        return 0.0;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (x, y) in points {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricType;
    use chrono::{Duration, TimeZone, Utc};

    fn sample_at(value: f64, hours_offset: i64) -> MetricSample {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        MetricSample {
            metric_type: MetricType::Cpu,
            metric_name: "cpu_usage".to_string(),
            metric_value: value,
            unit: "%".to_string(),
            timestamp: base + Duration::hours(hours_offset),
            host: "h1".to_string(),
            additional_data: None,
        }
    }

    #[test]
    fn test_no_history() {
        let current = sample_at(92.0, 3);
        assert_eq!(time_to_critical(&current, None, 95.0), None);
    }

    #[test]
    fn test_insufficient_history() {
        let current = sample_at(92.0, 3);
        let history = vec![sample_at(80.0, 0), sample_at(85.0, 1)];
        assert_eq!(time_to_critical(&current, Some(&history), 95.0), None);
    }

    #[test]
    fn test_duplicate_timestamps_rejected() {
        let current = sample_at(92.0, 3);
        let history = vec![sample_at(80.0, 0), sample_at(85.0, 0), sample_at(90.0, 0)];
        assert_eq!(time_to_critical(&current, Some(&history), 95.0), None);
    }

    #[test]
    fn test_flat_or_falling_trend_rejected() {
        let current = sample_at(92.0, 3);
        let flat = vec![sample_at(90.0, 0), sample_at(90.0, 1), sample_at(90.0, 2)];
        assert_eq!(time_to_critical(&current, Some(&flat), 95.0), None);

        let falling = vec![sample_at(90.0, 0), sample_at(85.0, 1), sample_at(80.0, 2)];
        assert_eq!(time_to_critical(&current, Some(&falling), 95.0), None);
    }

    #[test]
    fn test_rising_trend_truncates_to_hours() {
        // Values [80, 85, 90] at hours [0, 1, 2]: slope 5/hr.
        // (95 - 92) / 5 = 0.6 hours, truncated to 0.
        let current = sample_at(92.0, 3);
        let history = vec![sample_at(80.0, 0), sample_at(85.0, 1), sample_at(90.0, 2)];
        assert_eq!(time_to_critical(&current, Some(&history), 95.0), Some(0));
    }

    #[test]
    fn test_rising_trend_hours_remaining() {
        // Slope 2/hr, 10 below critical: 5 hours out
        let current = sample_at(85.0, 3);
        let history = vec![sample_at(79.0, 0), sample_at(81.0, 1), sample_at(83.0, 2)];
        assert_eq!(time_to_critical(&current, Some(&history), 95.0), Some(5));
    }

    #[test]
    fn test_already_at_critical() {
        let current = sample_at(97.0, 3);
        let history = vec![sample_at(80.0, 0), sample_at(85.0, 1), sample_at(90.0, 2)];
        assert_eq!(time_to_critical(&current, Some(&history), 95.0), Some(0));
    }

    #[test]
    fn test_only_matching_history_counts() {
        let current = sample_at(92.0, 3);
        let mut history = vec![sample_at(80.0, 0), sample_at(85.0, 1)];
        // Third point is from another host and must not complete the set
        let mut other = sample_at(90.0, 2);
        other.host = "h2".to_string();
        history.push(other);
        assert_eq!(time_to_critical(&current, Some(&history), 95.0), None);
    }

    #[test]
    fn test_unsorted_history_is_sorted_first() {
        let current = sample_at(92.0, 4);
        let history = vec![sample_at(90.0, 2), sample_at(80.0, 0), sample_at(85.0, 1)];
        assert_eq!(time_to_critical(&current, Some(&history), 95.0), Some(0));
    }

    #[test]
    fn test_ols_slope() {
        let points: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        assert!((ols_slope(&points) - 2.0).abs() < 1e-9);
    }
}
