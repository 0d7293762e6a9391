use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the PEMIRA backend API.
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:3000".to_string(),
                request_timeout_secs: 30,
            },
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PEMIRA_API_URL") {
            self.backend.base_url = v;
        }
        if let Ok(v) = env::var("PEMIRA_REQUEST_TIMEOUT_SECS") {
            self.backend.request_timeout_secs =
                v.parse().unwrap_or(self.backend.request_timeout_secs);
        }
        self
    }
}

static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Global configuration singleton, loaded once from the environment.
pub fn config() -> &'static AppConfig {
    &CONFIG
}
