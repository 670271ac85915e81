//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (KEYDASH_*)
//! 2. TOML config file (if KEYDASH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::ExpiryPolicy;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (KEYDASH_*)
/// 2. TOML config file (if KEYDASH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via KEYDASH_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for favicon requests.
    ///
    /// Set via KEYDASH_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request fetch timeout in milliseconds.
    ///
    /// Set via KEYDASH_FETCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum bytes accepted per icon response.
    ///
    /// Set via KEYDASH_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// URL used by the network liveness probe.
    ///
    /// Set via KEYDASH_PROBE_URL environment variable.
    #[serde(default = "default_probe_url")]
    pub probe_url: String,

    /// Retention for successfully fetched icons, in milliseconds.
    ///
    /// Set via KEYDASH_SUCCESS_TTL_MS environment variable.
    #[serde(default = "default_success_ttl_ms")]
    pub success_ttl_ms: u64,

    /// Retention for confirmed-absent entries, in milliseconds.
    ///
    /// Set via KEYDASH_FAILURE_TTL_MS environment variable.
    #[serde(default = "default_failure_ttl_ms")]
    pub failure_ttl_ms: u64,

    /// Interval between expired-entry sweeps, in milliseconds.
    ///
    /// Set via KEYDASH_SWEEP_INTERVAL_MS environment variable.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./keydash-cache.sqlite")
}

fn default_user_agent() -> String {
    "keydash/0.1".into()
}

fn default_fetch_timeout_ms() -> u64 {
    8_000
}

fn default_max_bytes() -> usize {
    1_048_576 // 1MB, far above any sane favicon
}

fn default_probe_url() -> String {
    "https://httpbin.org/get".into()
}

fn default_success_ttl_ms() -> u64 {
    7 * 24 * 60 * 60 * 1000
}

fn default_failure_ttl_ms() -> u64 {
    24 * 60 * 60 * 1000
}

fn default_sweep_interval_ms() -> u64 {
    60 * 60 * 1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_bytes: default_max_bytes(),
            probe_url: default_probe_url(),
            success_ttl_ms: default_success_ttl_ms(),
            failure_ttl_ms: default_failure_ttl_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Fetch timeout as Duration for use with reqwest/tokio.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Sweep interval as Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Retention policy derived from the configured windows.
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy {
            success_max_age: Duration::from_millis(self.success_ttl_ms),
            failure_max_age: Duration::from_millis(self.failure_ttl_ms),
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `KEYDASH_`
    /// 2. TOML file from `KEYDASH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("KEYDASH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("KEYDASH_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
