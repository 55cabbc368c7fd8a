//! HTTP API for metric analysis, health checks and Prometheus metrics

use alerting_lib::{
    engine::AnalysisEngine,
    health::{ComponentStatus, HealthRegistry},
    models::{AnalysisResult, HealthStatus, MetricSample, PredictionResult},
    observability::{ServiceMetrics, StructuredLogger},
    DEFAULT_ANOMALY_THRESHOLD, DEFAULT_PREDICTION_HORIZON_HOURS,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AnalysisEngine>,
    pub health_registry: HealthRegistry,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        engine: Arc<AnalysisEngine>,
        health_registry: HealthRegistry,
        metrics: ServiceMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            engine,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Anomaly analysis request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub metrics: Vec<MetricSample>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_ANOMALY_THRESHOLD
}

/// Failure prediction request body
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub metrics: Vec<MetricSample>,
    #[serde(default)]
    pub historical_data: Option<Vec<MetricSample>>,
    #[serde(default = "default_horizon")]
    pub prediction_horizon: u32,
}

fn default_horizon() -> u32 {
    DEFAULT_PREDICTION_HORIZON_HOURS
}

/// Analyze a batch of metric samples for anomalies
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<AnalysisResult> {
    let start = Instant::now();
    state.metrics.add_samples_received(request.metrics.len() as u64);

    let result = state
        .engine
        .analyze_anomalies(&request.metrics, request.threshold);

    state
        .metrics
        .observe_analysis_latency(start.elapsed().as_secs_f64());
    state.metrics.inc_analyses();
    state
        .metrics
        .add_anomalies_detected(result.anomalies_detected as u64);
    state.metrics.set_model_fitted(state.engine.is_model_fitted());

    for anomaly in &result.anomalies {
        state.logger.log_anomaly(
            &anomaly.metric_name,
            anomaly.severity,
            anomaly.anomaly_score,
            &anomaly.description,
        );
    }
    state.logger.log_analysis(
        &result.request_id.to_string(),
        request.metrics.len(),
        result.anomalies_detected,
        result.overall_risk_score,
    );

    Json(result)
}

/// Predict per-component failure risk
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Json<PredictionResult> {
    let start = Instant::now();
    state.metrics.add_samples_received(request.metrics.len() as u64);

    let result = state.engine.predict_failures(
        &request.metrics,
        request.historical_data.as_deref(),
        request.prediction_horizon,
    );

    state
        .metrics
        .observe_prediction_latency(start.elapsed().as_secs_f64());
    state.metrics.inc_predictions();

    state.logger.log_prediction(
        &result.request_id.to_string(),
        request.metrics.len(),
        result.high_risk_components,
        result.overall_risk_score,
    );

    Json(result)
}

/// Engine health snapshot
async fn engine_health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(state.engine.health_status())
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ai/analyze", post(analyze))
        .route("/ai/predict", post(predict))
        .route("/ai/health", get(engine_health))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
