//! Core traits for the dhdns system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DnsProvider`]: List, remove and add records via a provider API
//! - [`IpSource`]: Look up the caller's current IP address
//! - [`Notifier`]: Deliver push notifications about reconciliation outcomes

pub mod dns_provider;
pub mod ip_source;
pub mod notifier;

pub use dns_provider::{DnsProvider, DnsRecord, RecordType};
pub use ip_source::IpSource;
pub use notifier::Notifier;
