use chrono::Duration;
use frontdesk_catalog::{CatalogConfig, CatalogConfigError};
use serde::Deserialize;
use std::env;

use crate::reservations::DEFAULT_HOLD_MINUTES;

/// Longest hold the service will hand out.
const MAX_HOLD_SECONDS: u64 = 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub booking: BookingRules,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u64,
    /// When set, a background task evicts lapsed holds on this interval.
    /// Otherwise holds are only evicted when the store is accessed.
    #[serde(default)]
    pub sweep_interval_seconds: Option<u64>,
}

fn default_hold_seconds() -> u64 { DEFAULT_HOLD_MINUTES as u64 * 60 }

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            hold_seconds: default_hold_seconds(),
            sweep_interval_seconds: None,
        }
    }
}

impl BookingRules {
    pub fn hold_duration(&self) -> Duration {
        Duration::seconds(self.hold_seconds.min(MAX_HOLD_SECONDS) as i64)
    }

    pub fn sweep_interval(&self) -> Option<std::time::Duration> {
        self.sweep_interval_seconds
            .filter(|secs| *secs > 0)
            .map(std::time::Duration::from_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("Invalid catalog configuration: {0}")]
    Catalog(#[from] CatalogConfigError),

    #[error("Hold duration must be between 1 and 86400 seconds (got {0})")]
    HoldDuration(u64),
}

impl Config {
    pub fn load() -> Result<Self, ConfigLoadError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `FRONTDESK__SERVER__PORT=8080` sets `server.port`
            .add_source(config::Environment::with_prefix("FRONTDESK").separator("__"))
            .build()?;

        Self::finish(s)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigLoadError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        Self::finish(s)
    }

    fn finish(s: config::Config) -> Result<Self, ConfigLoadError> {
        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let hold = self.booking.hold_seconds;
        if hold == 0 || hold > MAX_HOLD_SECONDS {
            return Err(ConfigLoadError::HoldDuration(hold));
        }
        self.catalog.validate()?;
        Ok(())
    }
}
