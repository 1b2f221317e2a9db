//! Public IP resolution with last-known fallback
//!
//! ```text
//! IpSource::current() ──ok──▶ classify ──PUBLIC v4──▶ Resolved(ip)
//!        │                        │
//!       err                  non-public / v6
//!        └──────────┬─────────────┘
//!                   ▼
//!        last known IP set? ──yes──▶ Fallback { ip }
//!                   │
//!                   no ──▶ Unresolved (cycle is skipped)
//! ```

use std::net::{IpAddr, Ipv4Addr};

use tracing::{debug, error, info, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::ip::classify;
use crate::traits::IpSource;

/// Address a reconciliation cycle runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Fresh public address from the IP source
    Resolved(Ipv4Addr),

    /// Lookup failed or was rejected; re-affirm the last known address
    Fallback { ip: Ipv4Addr, reason: String },

    /// Lookup failed and there is no last known address
    Unresolved { reason: String },
}

impl Resolution {
    /// Address to reconcile with, if any
    pub fn ip(&self) -> Option<Ipv4Addr> {
        match self {
            Resolution::Resolved(ip) | Resolution::Fallback { ip, .. } => Some(*ip),
            Resolution::Unresolved { .. } => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback { .. })
    }
}

/// Wraps an [`IpSource`] with classification and the fallback policy
pub struct IpResolver {
    source: Box<dyn IpSource>,
}

impl IpResolver {
    pub fn new(source: Box<dyn IpSource>) -> Self {
        Self { source }
    }

    /// Look up the current address and accept it only if it is public IPv4
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: A public IPv4 address
    /// - `Err(Error)`: Transport failure (`ErrorKind::Transport`) or a
    ///   rejected address (`ErrorKind::Validation`)
    pub async fn lookup(&self) -> Result<Ipv4Addr> {
        let ip = self.source.current().await?;
        let class = classify(&ip);

        if !class.is_public() {
            return Err(Error::validation(format!(
                "{class} IP address detected: [{ip}]. PUBLIC IP required"
            )));
        }

        match ip {
            IpAddr::V4(v4) => {
                debug!("{} IP address detected: [{}]", class, v4);
                Ok(v4)
            }
            IpAddr::V6(v6) => Err(Error::validation(format!(
                "IPv6 address detected: [{v6}]. IPv4 required for A records"
            ))),
        }
    }

    /// Resolve the address for this cycle
    ///
    /// `last_known` is the address the previous reconciling cycle ran with.
    pub async fn resolve(&self, last_known: Option<Ipv4Addr>) -> Resolution {
        let reason = match self.lookup().await {
            Ok(ip) => return Resolution::Resolved(ip),
            Err(e) => {
                match e.kind() {
                    ErrorKind::Validation => warn!("{}, ignoring.", e.message()),
                    _ => error!("IP lookup via {} failed: {}", self.source.source_name(), e),
                }
                e.message()
            }
        };

        match last_known {
            Some(ip) => {
                info!("Falling back to last known IP [{}]", ip);
                Resolution::Fallback { ip, reason }
            }
            None => {
                warn!("No valid IP address available, skipping this cycle");
                Resolution::Unresolved { reason }
            }
        }
    }
}
