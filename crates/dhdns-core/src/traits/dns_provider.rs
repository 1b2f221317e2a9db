// # DNS Provider Trait
//
// Defines the interface for reading and writing DNS records via provider APIs.
//
// ## Implementations
//
// - DreamHost: `dhdns-provider-dreamhost` crate
//
// ## Usage
//
// ```rust,ignore
// use dhdns_core::DnsProvider;
// use dhdns_core::traits::RecordType;
//
// let provider = /* DnsProvider implementation */;
//
// let records = provider.list_records().await?;
// provider.remove_record("dyn.example.com", RecordType::A, "198.51.100.9").await?;
// provider
//     .add_record("dyn.example.com", "203.0.113.5".parse()?, Some("updated"))
//     .await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// DNS record type handled by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }

    /// Record type that holds the given address
    pub fn for_ip(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => RecordType::A,
            IpAddr::V6(_) => RecordType::Aaaa,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record as listed by a provider
///
/// `record_type` stays a string because providers list every record type
/// in the account (CNAME, MX, TXT, ...), not only the ones we manage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Fully qualified record name
    pub name: String,
    /// Record type as reported by the provider
    pub record_type: String,
    /// Record value (an IP address string for A/AAAA records)
    pub value: String,
    /// Whether the provider allows this record to be modified
    pub editable: bool,
    /// Free-form comment attached to the record
    pub comment: Option<String>,
}

impl DnsRecord {
    /// Check whether this record has the given type
    pub fn is_type(&self, record_type: RecordType) -> bool {
        self.record_type.eq_ignore_ascii_case(record_type.as_str())
    }
}

/// Trait for DNS provider implementations
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (the next poll cycle is the retry)
/// - ❌ Decide whether an update is needed (owned by the reconciler)
/// - ❌ Cache listings between calls (the snapshot is rebuilt every cycle)
/// - ❌ Spawn tasks or threads
///
/// Each method issues exactly one API call. A failure is reported as
/// `Error::Http` for transport problems and `Error::Provider` for a
/// well-formed response that reports an error.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every DNS record in the account
    async fn list_records(&self) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Remove one record, identified by name, type and current value
    ///
    /// `value` is passed through exactly as the provider listed it.
    async fn remove_record(
        &self,
        record_name: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<(), crate::Error>;

    /// Add one record pointing at `ip`
    ///
    /// The record type follows the address family. When `comment` is `None`
    /// no comment parameter is sent at all.
    async fn add_record(
        &self,
        record_name: &str,
        ip: IpAddr,
        comment: Option<&str>,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
