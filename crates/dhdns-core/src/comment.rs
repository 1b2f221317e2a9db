//! Record comment templates
//!
//! A template is plain text with an optional `{date}` token. The token is
//! replaced with the UTC timestamp at the moment the record is created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::format_timestamp;

/// Token replaced by the current UTC timestamp
pub const DATE_TOKEN: &str = "{date}";

/// Comment attached to newly created records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentTemplate(String);

impl CommentTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Template without any comment
    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the comment for a record created at `at`
    ///
    /// Returns `None` for an empty template so callers omit the comment
    /// parameter entirely instead of sending an empty one.
    pub fn render(&self, at: DateTime<Utc>) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.replace(DATE_TOKEN, &format_timestamp(at)))
    }
}

impl From<&str> for CommentTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}
