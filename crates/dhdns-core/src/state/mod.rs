// # Reconciliation State
//
// Everything the poll loop remembers, all in memory:
//
// - `Domain`: one managed name plus its last successful update
// - `RecordSnapshot`: the provider's A records, rebuilt every cycle
// - `CurrentIp`: the last address a reconciliation pass ran with
//
// Nothing here survives a restart.

pub mod domain;
pub mod snapshot;

pub use domain::Domain;
pub use snapshot::{ProviderRecord, RecordSnapshot};

use std::net::Ipv4Addr;

/// Last public IPv4 address a reconciliation pass ran with
///
/// Starts out unset. Only the engine writes it, and only after a cycle that
/// actually reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentIp(Option<Ipv4Addr>);

impl CurrentIp {
    pub fn unset() -> Self {
        Self(None)
    }

    pub fn known(ip: Ipv4Addr) -> Self {
        Self(Some(ip))
    }

    pub fn get(&self) -> Option<Ipv4Addr> {
        self.0
    }

    pub fn set(&mut self, ip: Ipv4Addr) {
        self.0 = Some(ip);
    }
}
