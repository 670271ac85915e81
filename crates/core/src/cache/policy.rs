//! Retention policy for cached icons.
//!
//! Two retention classes exist: successfully fetched icons are kept for a
//! long window (favicons rarely change), confirmed-absent entries for a
//! short one so the domain gets retried.

use std::time::Duration;

use super::icons::IconRecord;

/// Default retention for successfully fetched icons: 7 days.
pub const DEFAULT_SUCCESS_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default retention for confirmed-absent entries: 1 day.
pub const DEFAULT_FAILURE_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Per-class expiry windows applied to [`IconRecord`]s.
///
/// The store itself never filters on expiry; the acquisition coordinator
/// applies this policy on read, and the periodic sweep applies it for
/// eviction.
#[derive(Debug, Clone)]
pub struct ExpiryPolicy {
    pub success_max_age: Duration,
    pub failure_max_age: Duration,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            success_max_age: DEFAULT_SUCCESS_MAX_AGE,
            failure_max_age: DEFAULT_FAILURE_MAX_AGE,
        }
    }
}

impl ExpiryPolicy {
    /// Retention window for the given outcome class.
    pub fn max_age(&self, failed: bool) -> Duration {
        if failed { self.failure_max_age } else { self.success_max_age }
    }

    /// Whether a record has outlived its retention window at `now_ms`.
    pub fn is_expired(&self, record: &IconRecord, now_ms: i64) -> bool {
        let age = now_ms.saturating_sub(record.fetched_at);
        age >= self.max_age(record.is_failed()).as_millis() as i64
    }
}

/// Current time as milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
