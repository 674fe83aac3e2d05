use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct EstimatorConfig {
    pub python: String,
    pub script: String,
    pub model_path: String,
    pub timeout_secs: u64,
}

impl EstimatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Enables the `Secure` attribute on the auth cookie.
    pub production: bool,
    pub estimator: EstimatorConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let estimator = EstimatorConfig {
            python: std::env::var("PCOS_PYTHON").unwrap_or_else(|_| "python".into()),
            script: std::env::var("PCOS_PREDICT_SCRIPT")
                .unwrap_or_else(|_| "dataset/predict.py".into()),
            model_path: std::env::var("PCOS_MODEL_PATH")
                .unwrap_or_else(|_| "dataset/pcos_model.joblib".into()),
            timeout_secs: std::env::var("PCOS_ESTIMATOR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(15),
        };
        Ok(Self {
            database_url,
            production,
            estimator,
        })
    }
}
