//! Observability infrastructure for the alerting service
//!
//! Provides:
//! - Prometheus metrics (analysis/prediction latency, anomaly counters,
//!   model fit state)
//! - Structured JSON logging with tracing

use crate::models::Severity;
use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    analysis_latency_seconds: Histogram,
    prediction_latency_seconds: Histogram,
    analyses_total: IntCounter,
    predictions_total: IntCounter,
    anomalies_detected_total: IntCounter,
    samples_received_total: IntCounter,
    model_fitted: IntGauge,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            analysis_latency_seconds: register_histogram!(
                "alerting_analysis_latency_seconds",
                "Time spent running anomaly analysis",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register analysis_latency_seconds"),

            prediction_latency_seconds: register_histogram!(
                "alerting_prediction_latency_seconds",
                "Time spent running failure prediction",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            analyses_total: register_int_counter!(
                "alerting_analyses_total",
                "Total number of anomaly analysis requests served"
            )
            .expect("Failed to register analyses_total"),

            predictions_total: register_int_counter!(
                "alerting_predictions_total",
                "Total number of failure prediction requests served"
            )
            .expect("Failed to register predictions_total"),

            anomalies_detected_total: register_int_counter!(
                "alerting_anomalies_detected_total",
                "Total number of anomalies flagged"
            )
            .expect("Failed to register anomalies_detected_total"),

            samples_received_total: register_int_counter!(
                "alerting_samples_received_total",
                "Total number of metric samples received for scoring"
            )
            .expect("Failed to register samples_received_total"),

            model_fitted: register_int_gauge!(
                "alerting_model_fitted",
                "Whether the outlier model has been fitted (0/1)"
            )
            .expect("Failed to register model_fitted"),
        }
    }
}

/// Service metrics for Prometheus exposition.
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying registry.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_analysis_latency(&self, duration_secs: f64) {
        self.inner().analysis_latency_seconds.observe(duration_secs);
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_analyses(&self) {
        self.inner().analyses_total.inc();
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn add_anomalies_detected(&self, count: u64) {
        self.inner().anomalies_detected_total.inc_by(count);
    }

    pub fn add_samples_received(&self, count: u64) {
        self.inner().samples_received_total.inc_by(count);
    }

    pub fn set_model_fitted(&self, fitted: bool) {
        self.inner().model_fitted.set(i64::from(fitted));
    }
}

/// Structured logger for significant service events.
///
/// Keeps request-level log records consistent across the analysis and
/// prediction paths.
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn log_startup(&self, version: &str) {
        info!(
            event = "service_started",
            service = %self.service_name,
            version = %version,
            "Alerting service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Alerting service shutting down"
        );
    }

    pub fn log_analysis(
        &self,
        request_id: &str,
        samples: usize,
        anomalies_detected: usize,
        overall_risk_score: f64,
    ) {
        info!(
            event = "analysis_completed",
            service = %self.service_name,
            request_id = %request_id,
            samples = samples,
            anomalies_detected = anomalies_detected,
            overall_risk_score = overall_risk_score,
            "Anomaly analysis served"
        );
    }

    pub fn log_prediction(
        &self,
        request_id: &str,
        samples: usize,
        high_risk_components: usize,
        overall_risk_score: f64,
    ) {
        info!(
            event = "prediction_completed",
            service = %self.service_name,
            request_id = %request_id,
            samples = samples,
            high_risk_components = high_risk_components,
            overall_risk_score = overall_risk_score,
            "Failure prediction served"
        );
    }

    /// Log one flagged anomaly; critical findings are warnings
    pub fn log_anomaly(
        &self,
        metric_name: &str,
        severity: Severity,
        anomaly_score: f64,
        description: &str,
    ) {
        match severity {
            Severity::Critical => {
                warn!(
                    event = "anomaly_detected",
                    service = %self.service_name,
                    metric_name = %metric_name,
                    severity = %severity.as_str(),
                    anomaly_score = anomaly_score,
                    details = %description,
                    "Critical anomaly detected"
                );
            }
            _ => {
                info!(
                    event = "anomaly_detected",
                    service = %self.service_name,
                    metric_name = %metric_name,
                    severity = %severity.as_str(),
                    anomaly_score = anomaly_score,
                    details = %description,
                    "Anomaly detected"
                );
            }
        }
    }

}
