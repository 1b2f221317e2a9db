// # IP Source Trait
//
// Defines the interface for looking up the caller's current IP address.
//
// ## Implementations
//
// - HTTP echo service: `dhdns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dhdns_core::IpSource;
//
// let source = /* IpSource implementation */;
// let ip = source.current().await?;
// ```
//
// Sources only report what they observe. Classification (public vs.
// private) and the fallback to the last known address belong to
// `engine::IpResolver`.

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for IP source implementations
///
/// # Trust Level: Semi-Trusted
///
/// ## Allowed Capabilities
/// - ✅ Perform one lookup per call (HTTP request, socket query)
/// - ✅ Parse the lookup result into an `IpAddr`
///
/// ## Forbidden Capabilities
/// - ❌ Perform DNS updates (use `DnsProvider`)
/// - ❌ Cache or remember previous answers (owned by the engine's `CurrentIp`)
/// - ❌ Retry or sleep (the next poll cycle is the retry)
/// - ❌ Decide whether an address is acceptable (owned by `IpResolver`)
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Look up the current IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The address reported by the source, unclassified
    /// - `Err(Error)`: Transport failure or an unparsable answer
    async fn current(&self) -> Result<IpAddr, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
