//! Service configuration

use anyhow::Result;
use serde::Deserialize;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Name reported in structured log records
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// HTTP port for the analysis/health/metrics API
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_service_name() -> String {
    std::env::var("SERVICE_NAME").unwrap_or_else(|_| "smart-alerting".to_string())
}

fn default_api_port() -> u16 {
    8080
}

impl ServiceConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("ALERTING"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServiceConfig {
            service_name: default_service_name(),
            api_port: default_api_port(),
        }))
    }
}
