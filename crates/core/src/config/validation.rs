//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 16MB
    /// - `fetch_timeout_ms` is less than 100ms or exceeds 1 minute
    /// - `user_agent` is empty
    /// - a retention window is 0
    /// - the sweep interval is under 1 second
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 16 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 16MB".into() });
        }

        if self.fetch_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.fetch_timeout_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.success_ttl_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "success_ttl_ms".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.failure_ttl_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "failure_ttl_ms".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.sweep_interval_ms < 1_000 {
            return Err(ConfigError::Invalid {
                field: "sweep_interval_ms".into(),
                reason: "must be at least 1 second (1000ms)".into(),
            });
        }

        if self.failure_ttl_ms > self.success_ttl_ms {
            tracing::warn!(
                failure_ttl_ms = self.failure_ttl_ms,
                success_ttl_ms = self.success_ttl_ms,
                "failure retention exceeds success retention; \
                 failed domains will be retried less often than fresh icons expire"
            );
        }

        Ok(())
    }
}
