use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub enable_swagger: bool,
    pub enable_cors: bool,
    pub require_auth: bool,
    pub shutdown_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix
            .add_source(Environment::with_prefix("APP").try_parsing(true))
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("enable_cors", true)?
            .set_default("require_auth", true)?
            .set_default("shutdown_timeout_secs", 5)?
            .build()?;

        config.try_deserialize()
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
