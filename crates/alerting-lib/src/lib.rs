//! Analysis engine library for the smart alerting service
//!
//! This crate provides the core functionality for:
//! - Anomaly scoring of metric batches via an isolation-forest ensemble
//! - Component failure-risk estimation and time-to-failure extrapolation
//! - Recommendation synthesis
//! - Health checks and observability

pub mod engine;
pub mod health;
pub mod models;
pub mod observability;

pub use engine::{
    AnalysisEngine, EngineConfig, EngineError, DEFAULT_ANOMALY_THRESHOLD,
    DEFAULT_PREDICTION_HORIZON_HOURS,
};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
