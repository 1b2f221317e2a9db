use chrono::{DateTime, Utc};

use crate::time::format_timestamp;

/// A configured name kept in sync with the current IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    name: String,
    last_update: Option<DateTime<Utc>>,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_update: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time of the last record created for this domain, if any
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Last update formatted as `2024-01-02T03:04:05Z`
    pub fn last_update_display(&self) -> Option<String> {
        self.last_update.map(format_timestamp)
    }

    pub(crate) fn mark_updated(&mut self, at: DateTime<Utc>) {
        self.last_update = Some(at);
    }
}
