//! Per-cycle snapshot of the provider's A records

use std::collections::HashMap;
use std::net::IpAddr;

use crate::traits::{DnsRecord, RecordType};

/// The provider's view of one managed name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    /// Value exactly as listed by the provider
    pub value: String,
    pub editable: bool,
    pub comment: Option<String>,
}

impl ProviderRecord {
    /// Whether this record already points at `ip`
    ///
    /// Values that do not parse as an address never match, so a malformed
    /// record gets replaced.
    pub fn points_at(&self, ip: IpAddr) -> bool {
        self.value
            .trim()
            .parse::<IpAddr>()
            .is_ok_and(|value| value == ip)
    }
}

/// A records keyed by name
///
/// Built fresh from one listing; never merged with an older snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSnapshot {
    records: HashMap<String, ProviderRecord>,
}

impl RecordSnapshot {
    /// Snapshot with no records, used when the listing failed
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keep only A records from a full account listing
    ///
    /// If the provider lists several A records for one name, the last one wins.
    pub fn from_records(records: impl IntoIterator<Item = DnsRecord>) -> Self {
        let records = records
            .into_iter()
            .filter(|record| record.is_type(RecordType::A))
            .map(|record| {
                (
                    record.name,
                    ProviderRecord {
                        value: record.value,
                        editable: record.editable,
                        comment: record.comment,
                    },
                )
            })
            .collect();

        Self { records }
    }

    pub fn get(&self, name: &str) -> Option<&ProviderRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
