//! Metric analysis engine
//!
//! Composes feature encoding, the outlier model, severity classification,
//! risk scoring, trend estimation, and recommendation synthesis into the
//! two public operations: anomaly analysis and failure prediction. The
//! engine owns the outlier model's fit/reuse lifecycle and never lets a
//! failure escape its operation boundary; internal errors degrade to
//! empty results carrying a descriptive recommendation.

mod features;
mod outlier;
mod recommend;
mod risk;
mod severity;
mod trend;

pub use features::{encode, FeatureVector, NUM_FEATURES};
pub use outlier::{
    normalize_scores, OutlierConfig, OutlierModel, OutlierScore, NORMALIZATION_EPSILON,
};
pub use recommend::{analysis_recommendations, prediction_recommendations};
pub use risk::{
    component_risk, contributing_factors, mitigation_suggestions, prediction_confidence,
    ThresholdTable, Thresholds,
};
pub use trend::{time_to_critical, MIN_HISTORY_SAMPLES};

use crate::models::{
    AnalysisResult, AnomalyFinding, FailureRisk, HealthStatus, MetricSample, MetricType,
    PredictionResult,
};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Default anomaly-score threshold. Deliberately above the normalized
/// score range, so the model's outlier label is what triggers findings
/// unless the caller opts into a stricter cutoff.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;

/// Default failure prediction horizon in hours
pub const DEFAULT_PREDICTION_HORIZON_HOURS: u32 = 24;

/// Internal engine failures. These never cross the public operation
/// boundary; they are logged and converted into degraded results.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("non-finite value encountered for metric {metric_name}")]
    NonFiniteValue { metric_name: String },
    #[error("outlier model lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Engine construction parameters
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub outlier: OutlierConfig,
    pub thresholds: ThresholdTable,
}

/// Stateful analysis engine, constructed once at startup and shared by
/// reference across requests.
pub struct AnalysisEngine {
    config: EngineConfig,
    model: RwLock<OutlierModel>,
    started_at: Instant,
}

impl AnalysisEngine {
    pub fn new(config: EngineConfig) -> Self {
        let model = OutlierModel::new(config.outlier.clone());
        Self {
            config,
            model: RwLock::new(model),
            started_at: Instant::now(),
        }
    }

    /// Score a batch of samples for anomalies.
    ///
    /// The first non-empty batch also fits the outlier model; every later
    /// call reuses those parameters. Empty input and internal failures
    /// both produce well-formed zero-anomaly results.
    pub fn analyze_anomalies(&self, samples: &[MetricSample], threshold: f64) -> AnalysisResult {
        if samples.is_empty() {
            return AnalysisResult {
                request_id: Uuid::new_v4(),
                timestamp: Utc::now(),
                anomalies_detected: 0,
                anomalies: Vec::new(),
                overall_risk_score: 0.0,
                recommendations: vec!["No metrics provided for analysis".to_string()],
            };
        }

        match self.run_analysis(samples, threshold) {
            Ok(result) => {
                info!(
                    request_id = %result.request_id,
                    samples = samples.len(),
                    anomalies = result.anomalies_detected,
                    overall_risk = result.overall_risk_score,
                    "Anomaly analysis completed"
                );
                result
            }
            Err(err) => {
                error!(error = %err, "Anomaly analysis failed");
                AnalysisResult {
                    request_id: Uuid::new_v4(),
                    timestamp: Utc::now(),
                    anomalies_detected: 0,
                    anomalies: Vec::new(),
                    overall_risk_score: 0.0,
                    recommendations: vec![format!("Analysis failed: {}", err)],
                }
            }
        }
    }

    fn run_analysis(
        &self,
        samples: &[MetricSample],
        threshold: f64,
    ) -> Result<AnalysisResult, EngineError> {
        let features: Vec<FeatureVector> = samples.iter().map(features::encode).collect();
        for (sample, vector) in samples.iter().zip(&features) {
            if vector.iter().any(|v| !v.is_finite()) {
                return Err(EngineError::NonFiniteValue {
                    metric_name: sample.metric_name.clone(),
                });
            }
        }

        self.ensure_fitted(&features)?;

        let scores: Vec<OutlierScore> = {
            let model = self
                .model
                .read()
                .map_err(|e| EngineError::LockPoisoned(e.to_string()))?;
            features.iter().map(|f| model.score(f)).collect()
        };

        let raw: Vec<f64> = scores.iter().map(|s| s.raw).collect();
        let normalized = normalize_scores(&raw);

        let mut anomalies = Vec::new();
        for ((sample, score), norm) in samples.iter().zip(&scores).zip(&normalized) {
            if score.is_outlier || *norm > threshold {
                anomalies.push(AnomalyFinding {
                    metric_name: sample.metric_name.clone(),
                    metric_value: sample.metric_value,
                    anomaly_score: *norm,
                    severity: severity::classify(*norm),
                    confidence: severity::confidence(*norm),
                    description: severity::describe(sample, *norm),
                    timestamp: Utc::now(),
                });
            }
        }

        let overall_risk_score =
            (normalized.iter().sum::<f64>() / normalized.len() as f64).clamp(0.0, 1.0);
        let recommendations = recommend::analysis_recommendations(&anomalies, overall_risk_score);

        Ok(AnalysisResult {
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            anomalies_detected: anomalies.len(),
            anomalies,
            overall_risk_score,
            recommendations,
        })
    }

    /// Fit the outlier model on its first batch. Double-checked under the
    /// write lock so that at most one fit occurs even when concurrent
    /// first calls race; later calls are no-ops.
    fn ensure_fitted(&self, features: &[FeatureVector]) -> Result<(), EngineError> {
        let fitted = self
            .model
            .read()
            .map_err(|e| EngineError::LockPoisoned(e.to_string()))?
            .is_fitted();
        if fitted {
            return Ok(());
        }

        let mut model = self
            .model
            .write()
            .map_err(|e| EngineError::LockPoisoned(e.to_string()))?;
        if !model.is_fitted() {
            model.fit(features);
            info!(samples = features.len(), "Outlier model fitted on first batch");
        }
        Ok(())
    }

    /// Estimate per-component failure risk over the given horizon.
    pub fn predict_failures(
        &self,
        samples: &[MetricSample],
        historical: Option<&[MetricSample]>,
        horizon_hours: u32,
    ) -> PredictionResult {
        if samples.is_empty() {
            return PredictionResult {
                request_id: Uuid::new_v4(),
                timestamp: Utc::now(),
                prediction_horizon: horizon_hours,
                overall_risk_score: 0.0,
                high_risk_components: 0,
                failure_risks: Vec::new(),
                system_health_score: 1.0,
                recommendations: vec!["No metrics provided for prediction".to_string()],
            };
        }

        match self.run_prediction(samples, historical, horizon_hours) {
            Ok(result) => {
                info!(
                    request_id = %result.request_id,
                    samples = samples.len(),
                    high_risk_components = result.high_risk_components,
                    overall_risk = result.overall_risk_score,
                    "Failure prediction completed"
                );
                result
            }
            Err(err) => {
                error!(error = %err, "Failure prediction failed");
                PredictionResult {
                    request_id: Uuid::new_v4(),
                    timestamp: Utc::now(),
                    prediction_horizon: horizon_hours,
                    overall_risk_score: 0.0,
                    high_risk_components: 0,
                    failure_risks: Vec::new(),
                    system_health_score: 1.0,
                    recommendations: vec![format!("Prediction failed: {}", err)],
                }
            }
        }
    }

    fn run_prediction(
        &self,
        samples: &[MetricSample],
        historical: Option<&[MetricSample]>,
        horizon_hours: u32,
    ) -> Result<PredictionResult, EngineError> {
        for sample in samples {
            if !sample.metric_value.is_finite() {
                return Err(EngineError::NonFiniteValue {
                    metric_name: sample.metric_name.clone(),
                });
            }
        }

        let mut failure_risks = Vec::with_capacity(samples.len());
        let mut risk_by_type: BTreeMap<MetricType, f64> = BTreeMap::new();

        for sample in samples {
            let thresholds = self.config.thresholds.for_type(sample.metric_type);
            let risk_score = risk::component_risk(sample.metric_value, thresholds);

            failure_risks.push(FailureRisk {
                component: format!("{}_{}", sample.metric_type.as_str(), sample.metric_name),
                risk_score,
                confidence: risk::prediction_confidence(sample, historical),
                time_to_failure: trend::time_to_critical(sample, historical, thresholds.critical),
                contributing_factors: risk::contributing_factors(sample.metric_type, risk_score),
                mitigation_suggestions: risk::mitigation_suggestions(sample.metric_type, risk_score),
            });

            let entry = risk_by_type.entry(sample.metric_type).or_insert(0.0);
            if risk_score > *entry {
                *entry = risk_score;
            }
        }

        let overall_risk_score = (risk_by_type.values().sum::<f64>()
            / risk_by_type.len() as f64)
            .clamp(0.0, 1.0);
        let high_risk_components = failure_risks.iter().filter(|r| r.risk_score > 0.7).count();
        let component_types: BTreeSet<MetricType> = risk_by_type.keys().copied().collect();
        let recommendations = recommend::prediction_recommendations(
            &failure_risks,
            &component_types,
            overall_risk_score,
        );

        Ok(PredictionResult {
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            prediction_horizon: horizon_hours,
            overall_risk_score,
            high_risk_components,
            failure_risks,
            system_health_score: (1.0 - overall_risk_score).clamp(0.0, 1.0),
            recommendations,
        })
    }

    /// Whether the outlier model has been fitted yet
    pub fn is_model_fitted(&self) -> bool {
        self.model.read().map(|m| m.is_fitted()).unwrap_or(false)
    }

    /// Read-only health snapshot
    pub fn health_status(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_fitted: self.is_model_fitted(),
            uptime_seconds: self.started_at.elapsed().as_secs_f64(),
        }
    }
}
