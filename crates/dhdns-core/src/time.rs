//! Time abstraction for testability.
//!
//! Record comments and per-domain update stamps both need "now" in UTC.
//! The engine reads it through [`Clock`] so tests can pin the value.

use chrono::{DateTime, Utc};

/// Timestamp layout used in comments and update stamps (`2024-01-02T03:04:05Z`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Abstraction over wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock using the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Formats a timestamp as ISO-8601 UTC with second precision.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
