// # DreamHost DNS Provider
//
// This crate provides the DreamHost DNS provider implementation for dhdns.
//
// ## Behavior
//
// - One HTTP request per trait call; no retries, no caching, no background tasks
// - Every request carries a fresh `unique_id`, as the API requires
// - Provider-reported failures (`"result": "error"`) become `Error::Provider`
//   carrying DreamHost's own reason (e.g. `no_such_record`)
// - Transport failures and non-2xx statuses become `Error::Http`
// - Dry-run mode lists records normally but only logs removes and adds
//
// ## Security Requirements
//
// - API key NEVER appears in logs or `Debug` output
// - Provider fails fast on an empty key
//
// ## API Reference
//
// All commands are `GET {api_url}?key=..&format=json&unique_id=..&cmd=..`:
// - `dns-list_records`
// - `dns-remove_record` with `record`, `type`, `value`
// - `dns-add_record` with `record`, `type`, `value` and optional `comment`

use async_trait::async_trait;
use dhdns_core::config::ProviderConfig;
use dhdns_core::traits::{DnsProvider, DnsRecord, RecordType};
use dhdns_core::{Error, Result};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::net::IpAddr;
use std::time::Duration;

const PROVIDER_NAME: &str = "dreamhost";

/// Response envelope shared by every DreamHost command
#[derive(Debug, Deserialize)]
struct ApiResponse {
    result: String,
    #[serde(default)]
    data: Value,
}

/// One entry of `dns-list_records`
#[derive(Debug, Deserialize)]
struct ListedRecord {
    record: String,
    #[serde(rename = "type")]
    record_type: String,
    value: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default = "editable_when_missing", deserialize_with = "deserialize_editable")]
    editable: bool,
}

fn editable_when_missing() -> bool {
    true
}

/// DreamHost reports `editable` as "0"/"1"; integers and booleans are accepted too
fn deserialize_editable<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(true),
        Value::Bool(flag) => Ok(flag),
        Value::Number(n) => Ok(n.as_f64().is_none_or(|n| n != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(de::Error::custom(format!(
                "invalid editable flag: {other:?}"
            ))),
        },
        other => Err(de::Error::custom(format!("invalid editable flag: {other}"))),
    }
}

impl From<ListedRecord> for DnsRecord {
    fn from(listed: ListedRecord) -> Self {
        DnsRecord {
            name: listed.record,
            record_type: listed.record_type,
            value: listed.value,
            editable: listed.editable,
            comment: listed.comment.filter(|c| !c.is_empty()),
        }
    }
}

/// Unwrap a DreamHost response body into its `data` payload
///
/// `"result": "success"` yields the payload; anything else is reported as a
/// provider error carrying the payload text.
pub fn parse_response(body: &str) -> Result<Value> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if response.result == "success" {
        return Ok(response.data);
    }

    let reason = match &response.data {
        Value::String(reason) => reason.clone(),
        Value::Null => format!("result: {}", response.result),
        other => other.to_string(),
    };
    Err(Error::provider(PROVIDER_NAME, reason))
}

/// Parse a `dns-list_records` response body
pub fn parse_records(body: &str) -> Result<Vec<DnsRecord>> {
    let data = parse_response(body)?;
    let listed: Vec<ListedRecord> = serde_json::from_value(data)?;
    Ok(listed.into_iter().map(DnsRecord::from).collect())
}

/// DreamHost DNS provider
///
/// Stateless apart from the HTTP client; every call is a single request.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true the provider still lists records, but
/// `remove_record` and `add_record` only log the request they would send
/// and report success.
pub struct DreamhostProvider {
    /// API base URL
    api_url: String,

    /// API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// HTTP client with the configured timeout
    client: reqwest::Client,

    /// Log writes instead of sending them
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DreamhostProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DreamhostProvider")
            .field("api_url", &self.api_url)
            .field("api_key", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DreamhostProvider {
    /// Create a new DreamHost provider
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an empty key or if the HTTP client cannot
    /// be built.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        dry_run: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("DreamHost API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_url: api_url.into(),
            api_key,
            client,
            dry_run,
        })
    }

    /// Create a provider from validated configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        match config {
            ProviderConfig::Dreamhost {
                api_url,
                api_key,
                dry_run,
                timeout_secs,
            } => {
                if *dry_run {
                    tracing::warn!(
                        "DreamHost provider running in DRY-RUN mode - no changes will be made"
                    );
                }
                Self::new(
                    api_url.clone(),
                    api_key.clone(),
                    *dry_run,
                    Duration::from_secs(*timeout_secs),
                )
            }
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Issue one API command and return its `data` payload
    async fn call(&self, cmd: &str, params: &[(&str, &str)]) -> Result<Value> {
        let unique_id = uuid::Uuid::new_v4().to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("key", self.api_key.as_str()),
            ("format", "json"),
            ("unique_id", unique_id.as_str()),
            ("cmd", cmd),
        ];
        query.extend_from_slice(params);

        tracing::debug!(cmd, unique_id = %unique_id, "Sending DreamHost API request");

        let response = self
            .client
            .get(&self.api_url)
            .query(&query)
            .send()
            .await
            // without_url keeps the key out of the error text
            .map_err(|e| Error::http(format!("{cmd} request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(format!("{cmd} returned HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read {cmd} response: {}", e.without_url())))?;

        parse_response(&body)
    }
}

#[async_trait]
impl DnsProvider for DreamhostProvider {
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        let data = self.call("dns-list_records", &[]).await?;
        let listed: Vec<ListedRecord> = serde_json::from_value(data)?;
        let records: Vec<DnsRecord> = listed.into_iter().map(DnsRecord::from).collect();
        tracing::debug!("DreamHost listed {} record(s)", records.len());
        Ok(records)
    }

    async fn remove_record(
        &self,
        record_name: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<()> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would remove {} record {} [{}]",
                record_type,
                record_name,
                value
            );
            return Ok(());
        }

        self.call(
            "dns-remove_record",
            &[
                ("record", record_name),
                ("type", record_type.as_str()),
                ("value", value),
            ],
        )
        .await?;
        Ok(())
    }

    async fn add_record(&self, record_name: &str, ip: IpAddr, comment: Option<&str>) -> Result<()> {
        let record_type = RecordType::for_ip(&ip);
        let value = ip.to_string();

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would add {} record {} [{}] with comment {:?}",
                record_type,
                record_name,
                value,
                comment
            );
            return Ok(());
        }

        let mut params = vec![
            ("record", record_name),
            ("type", record_type.as_str()),
            ("value", value.as_str()),
        ];
        if let Some(comment) = comment {
            params.push(("comment", comment));
        }

        self.call("dns-add_record", &params).await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
