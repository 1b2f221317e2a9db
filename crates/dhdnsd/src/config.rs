// Environment configuration for dhdnsd
//
// Every setting comes from a `DDNS_*` environment variable, read once at
// startup. Values are parsed here and validated by `dhdns_core::config` so
// the daemon fails before any network traffic.

use anyhow::{Context, Result, bail};
use dhdns_core::config::{
    DEFAULT_COMMENT, DEFAULT_DREAMHOST_API_URL, DEFAULT_IP_SOURCE_URL, DEFAULT_PROWL_API_URL,
};
use dhdns_core::{
    CommentTemplate, DdnsConfig, EngineConfig, IpSourceConfig, NotifierConfig, ProviderConfig,
    RecordConfig,
};
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_UPDATE_INTERVAL_MINUTES: u64 = 60;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PROWL_APPLICATION: &str = "dhdns";

/// Where and how verbosely to log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// trace, debug, info, warn or error
    pub level: String,

    /// Directory for the daily rotated log file; stdout when unset
    pub dir: Option<PathBuf>,
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub ddns: DdnsConfig,
    pub log: LogSettings,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, treating empty values as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = var("DDNS_PROVIDER_API_KEY").context(
            "DDNS_PROVIDER_API_KEY is required. \
            Set it via: export DDNS_PROVIDER_API_KEY=your_key",
        )?;
        check_not_placeholder("DDNS_PROVIDER_API_KEY", &api_key)?;

        let records: Vec<RecordConfig> = var("DDNS_RECORDS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(RecordConfig::new)
            .collect();
        if records.is_empty() {
            bail!(
                "DDNS_RECORDS must contain at least one record. \
                Set it via: export DDNS_RECORDS=dyn.example.com,home.example.com"
            );
        }

        let timeout_secs = parse_or("DDNS_HTTP_TIMEOUT_SECS", var("DDNS_HTTP_TIMEOUT_SECS"), DEFAULT_HTTP_TIMEOUT_SECS)?;

        let provider = ProviderConfig::Dreamhost {
            api_url: var("DDNS_PROVIDER_API_URL")
                .unwrap_or_else(|| DEFAULT_DREAMHOST_API_URL.to_string()),
            api_key,
            dry_run: parse_mode(var("DDNS_MODE").as_deref())?,
            timeout_secs,
        };

        let ip_source = IpSourceConfig::Http {
            url: var("DDNS_IP_SOURCE_URL").unwrap_or_else(|| DEFAULT_IP_SOURCE_URL.to_string()),
            timeout_secs,
        };

        let notifier = var("DDNS_PROWL_API_KEY").map(|api_key| NotifierConfig::Prowl {
            api_key,
            application: var("DDNS_PROWL_APPLICATION")
                .unwrap_or_else(|| DEFAULT_PROWL_APPLICATION.to_string()),
            api_url: DEFAULT_PROWL_API_URL.to_string(),
            timeout_secs,
        });

        // An explicitly empty DDNS_COMMENT disables comments, so read it raw
        let comment = match lookup("DDNS_COMMENT") {
            Some(template) => CommentTemplate::new(template.trim()),
            None => CommentTemplate::new(DEFAULT_COMMENT),
        };

        let engine = EngineConfig {
            update_interval_minutes: parse_or(
                "DDNS_UPDATE_INTERVAL_MINUTES",
                var("DDNS_UPDATE_INTERVAL_MINUTES"),
                DEFAULT_UPDATE_INTERVAL_MINUTES,
            )?,
            comment,
        };

        let log = LogSettings {
            level: var("DDNS_LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
            dir: var("DDNS_LOG_DIR").map(PathBuf::from),
        };

        let mut ddns = DdnsConfig::new(provider, records);
        ddns.ip_source = ip_source;
        ddns.notifier = notifier;
        ddns.engine = engine;

        Ok(Self { ddns, log })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.log.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log.level
            ),
        }

        self.ddns.validate()?;
        Ok(())
    }
}

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number. Got: {raw}")),
        None => Ok(default),
    }
}

/// `DDNS_MODE`: unset or `live` writes records, `dry-run` only logs writes
fn parse_mode(mode: Option<&str>) -> Result<bool> {
    match mode.map(|m| m.trim().to_lowercase()).as_deref() {
        None | Some("live") => Ok(false),
        Some("dry-run") => Ok(true),
        Some(other) => bail!("DDNS_MODE '{other}' is not valid. Valid modes: live, dry-run"),
    }
}

/// Catch keys copied straight from the documentation
fn check_not_placeholder(name: &str, key: &str) -> Result<()> {
    let lower = key.to_lowercase();
    if lower.contains("your_key") || lower.contains("replace_me") || lower == "key" {
        bail!(
            "{name} appears to be a placeholder. \
            Use an actual API key from the DreamHost panel."
        );
    }
    Ok(())
}
