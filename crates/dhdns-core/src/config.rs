//! Configuration types for the dhdns system
//!
//! This module defines all configuration structures used throughout the crate.
//! Configuration is static: it is built once at startup and never reloaded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::comment::CommentTemplate;

/// Default DreamHost API endpoint
pub const DEFAULT_DREAMHOST_API_URL: &str = "https://api.dreamhost.com/";

/// Default IP echo service
pub const DEFAULT_IP_SOURCE_URL: &str = "https://api.ipify.org";

/// Default Prowl API base
pub const DEFAULT_PROWL_API_URL: &str = "https://api.prowlapp.com/publicapi";

/// Default comment attached to created records
pub const DEFAULT_COMMENT: &str = "Last updated by dhdns: {date}";

/// Main dhdns configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// IP source configuration
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// Optional push notifications
    #[serde(default)]
    pub notifier: Option<NotifierConfig>,

    /// DNS records to manage
    pub records: Vec<RecordConfig>,

    /// Poll loop settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl DdnsConfig {
    /// Create a configuration for the given provider and records, with defaults elsewhere
    pub fn new(provider: ProviderConfig, records: Vec<RecordConfig>) -> Self {
        Self {
            provider,
            ip_source: IpSourceConfig::default(),
            notifier: None,
            records,
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.records.is_empty() {
            return Err(crate::Error::config("No records configured"));
        }

        for record in &self.records {
            record.validate()?;
        }

        self.provider.validate()?;
        self.ip_source.validate()?;
        if let Some(notifier) = &self.notifier {
            notifier.validate()?;
        }
        self.engine.validate()?;

        Ok(())
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// DreamHost API
    Dreamhost {
        /// API base URL
        #[serde(default = "default_dreamhost_api_url")]
        api_url: String,
        /// DreamHost API key with the `dns-*` permissions
        api_key: String,
        /// Log writes instead of sending them
        #[serde(default)]
        dry_run: bool,
        /// Per-request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl ProviderConfig {
    /// DreamHost configuration with default URL and timeout
    pub fn dreamhost(api_key: impl Into<String>) -> Self {
        ProviderConfig::Dreamhost {
            api_url: default_dreamhost_api_url(),
            api_key: api_key.into(),
            dry_run: false,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Dreamhost {
                api_url,
                api_key,
                timeout_secs,
                ..
            } => {
                if api_key.is_empty() {
                    return Err(crate::Error::config("DreamHost API key cannot be empty"));
                }
                validate_http_url("DreamHost API URL", api_url)?;
                validate_timeout(*timeout_secs)
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Dreamhost { .. } => "dreamhost",
        }
    }
}

// Keeps the API key out of logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Dreamhost {
                api_url,
                dry_run,
                timeout_secs,
                ..
            } => f
                .debug_struct("Dreamhost")
                .field("api_url", api_url)
                .field("api_key", &"<REDACTED>")
                .field("dry_run", dry_run)
                .field("timeout_secs", timeout_secs)
                .finish(),
        }
    }
}

/// IP source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpSourceConfig {
    /// Plain-text IP echo service
    Http {
        /// URL that answers with the caller's IP
        url: String,
        /// Per-request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            IpSourceConfig::Http { url, timeout_secs } => {
                validate_http_url("IP source URL", url)?;
                validate_timeout(*timeout_secs)
            }
        }
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        IpSourceConfig::Http {
            url: DEFAULT_IP_SOURCE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Push notification configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifierConfig {
    /// Prowl push notifications
    Prowl {
        /// Prowl API key
        api_key: String,
        /// Application name shown in notifications
        #[serde(default = "default_application")]
        application: String,
        /// API base URL
        #[serde(default = "default_prowl_api_url")]
        api_url: String,
        /// Per-request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl NotifierConfig {
    /// Prowl configuration with defaults
    pub fn prowl(api_key: impl Into<String>) -> Self {
        NotifierConfig::Prowl {
            api_key: api_key.into(),
            application: default_application(),
            api_url: default_prowl_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Validate the notifier configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            NotifierConfig::Prowl {
                api_key,
                application,
                api_url,
                timeout_secs,
            } => {
                if api_key.is_empty() {
                    return Err(crate::Error::config("Prowl API key cannot be empty"));
                }
                if application.is_empty() {
                    return Err(crate::Error::config(
                        "Prowl application name cannot be empty",
                    ));
                }
                validate_http_url("Prowl API URL", api_url)?;
                validate_timeout(*timeout_secs)
            }
        }
    }
}

// Keeps the API key out of logs
impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifierConfig::Prowl {
                application,
                api_url,
                timeout_secs,
                ..
            } => f
                .debug_struct("Prowl")
                .field("api_key", &"<REDACTED>")
                .field("application", application)
                .field("api_url", api_url)
                .field("timeout_secs", timeout_secs)
                .finish(),
        }
    }
}

/// DNS record configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// DNS record name (e.g., "dyn.example.com")
    pub name: String,
}

impl RecordConfig {
    /// Create a new record configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Validate that the name is a valid domain name
    ///
    /// Basic RFC 1035 checks: total length, label length, label characters.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let domain = self.name.as_str();
        if domain.is_empty() {
            return Err(crate::Error::config("Domain name cannot be empty"));
        }

        if domain.len() > 253 {
            return Err(crate::Error::config(format!(
                "Domain name too long: {} chars (max 253). Got: {}",
                domain.len(),
                domain
            )));
        }

        for label in domain.split('.') {
            if label.is_empty() {
                return Err(crate::Error::config(format!(
                    "Domain name has empty label: '{domain}'"
                )));
            }

            if label.len() > 63 {
                return Err(crate::Error::config(format!(
                    "Domain label too long: {} chars (max 63). Label: '{}'",
                    label.len(),
                    label
                )));
            }

            if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(crate::Error::config(format!(
                    "Domain label contains invalid characters. Label: '{label}'. \
                    Valid: alphanumeric and hyphen only."
                )));
            }

            if label.starts_with('-') || label.ends_with('-') {
                return Err(crate::Error::config(format!(
                    "Domain label cannot start or end with hyphen. Label: '{label}'"
                )));
            }
        }

        Ok(())
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minutes between reconciliation cycles
    #[serde(default = "default_update_interval_minutes")]
    pub update_interval_minutes: u64,

    /// Comment attached to created records; empty means no comment
    #[serde(default = "default_comment")]
    pub comment: CommentTemplate,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !(1..=1440).contains(&self.update_interval_minutes) {
            return Err(crate::Error::config(format!(
                "Update interval must be between 1 and 1440 minutes. Got: {}",
                self.update_interval_minutes
            )));
        }
        Ok(())
    }

    /// Interval between cycles
    pub fn update_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.update_interval_minutes * 60)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            update_interval_minutes: default_update_interval_minutes(),
            comment: default_comment(),
        }
    }
}

fn validate_http_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{what} cannot be empty")));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{what} must use HTTP or HTTPS scheme. Got: {url}"
        )));
    }
    Ok(())
}

fn validate_timeout(timeout_secs: u64) -> Result<(), crate::Error> {
    if !(1..=300).contains(&timeout_secs) {
        return Err(crate::Error::config(format!(
            "HTTP timeout must be between 1 and 300 seconds. Got: {timeout_secs}"
        )));
    }
    Ok(())
}

fn default_dreamhost_api_url() -> String {
    DEFAULT_DREAMHOST_API_URL.to_string()
}

fn default_prowl_api_url() -> String {
    DEFAULT_PROWL_API_URL.to_string()
}

fn default_application() -> String {
    "dhdns".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_update_interval_minutes() -> u64 {
    60
}

fn default_comment() -> CommentTemplate {
    CommentTemplate::new(DEFAULT_COMMENT)
}
