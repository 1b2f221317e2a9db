//! Test doubles and common utilities for reconciliation contract tests
//!
//! Every double is `Clone` and shares its state through an `Arc`, so a test
//! can hand one copy to the engine and keep another for assertions.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use dhdns_core::config::{DdnsConfig, EngineConfig, ProviderConfig, RecordConfig};
use dhdns_core::error::{Error, Result};
use dhdns_core::time::Clock;
use dhdns_core::traits::{DnsProvider, DnsRecord, IpSource, Notifier, RecordType};
use dhdns_core::{CommentTemplate, DdnsEngine, NotifierGate};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

pub const DOMAIN: &str = "dyn.example.com";

/// A call observed by [`RecordingProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    List,
    Remove {
        name: String,
        value: String,
    },
    Add {
        name: String,
        value: String,
        comment: Option<String>,
    },
}

#[derive(Default)]
struct ProviderState {
    listing: Vec<DnsRecord>,
    list_error: Option<String>,
    failing_removes: HashSet<String>,
    failing_adds: HashSet<String>,
    calls: Vec<ProviderCall>,
}

/// A DnsProvider that serves a scripted listing and records every call
#[derive(Clone, Default)]
pub struct RecordingProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an A record to the listing
    pub fn with_a_record(self, name: &str, value: &str, editable: bool) -> Self {
        self.state.lock().unwrap().listing.push(a_record(name, value, editable));
        self
    }

    /// Add an arbitrary record to the listing
    pub fn with_record(self, record: DnsRecord) -> Self {
        self.state.lock().unwrap().listing.push(record);
        self
    }

    /// Replace the listing served from now on
    pub fn set_listing(&self, listing: Vec<DnsRecord>) {
        self.state.lock().unwrap().listing = listing;
    }

    /// Make `list_records` fail with a provider error
    pub fn fail_listing(&self, message: &str) {
        self.state.lock().unwrap().list_error = Some(message.to_string());
    }

    pub fn fail_remove(self, name: &str) -> Self {
        self.state.lock().unwrap().failing_removes.insert(name.to_string());
        self
    }

    pub fn fail_add(self, name: &str) -> Self {
        self.state.lock().unwrap().failing_adds.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls other than `List`
    pub fn writes(&self) -> Vec<ProviderCall> {
        self.calls()
            .into_iter()
            .filter(|call| *call != ProviderCall::List)
            .collect()
    }

    /// Writes touching one domain
    pub fn writes_for(&self, domain: &str) -> Vec<ProviderCall> {
        self.writes()
            .into_iter()
            .filter(|call| match call {
                ProviderCall::Remove { name, .. } | ProviderCall::Add { name, .. } => {
                    name == domain
                }
                ProviderCall::List => false,
            })
            .collect()
    }

    pub fn list_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == ProviderCall::List)
            .count()
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::List);
        match &state.list_error {
            Some(message) => Err(Error::provider("recording", message.clone())),
            None => Ok(state.listing.clone()),
        }
    }

    async fn remove_record(
        &self,
        record_name: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<()> {
        assert_eq!(record_type, RecordType::A);
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::Remove {
            name: record_name.to_string(),
            value: value.to_string(),
        });
        if state.failing_removes.contains(record_name) {
            return Err(Error::provider("recording", "no_such_record"));
        }
        Ok(())
    }

    async fn add_record(&self, record_name: &str, ip: IpAddr, comment: Option<&str>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::Add {
            name: record_name.to_string(),
            value: ip.to_string(),
            comment: comment.map(str::to_string),
        });
        if state.failing_adds.contains(record_name) {
            return Err(Error::provider("recording", "record_already_exists_remove_first"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// An IpSource whose answer the test controls
#[derive(Clone)]
pub struct ScriptedIpSource {
    answer: Arc<Mutex<std::result::Result<IpAddr, String>>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedIpSource {
    pub fn answering(ip: &str) -> Self {
        Self {
            answer: Arc::new(Mutex::new(Ok(ip.parse().unwrap()))),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Arc::new(Mutex::new(Err(message.to_string()))),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn answer(&self, ip: &str) {
        *self.answer.lock().unwrap() = Ok(ip.parse().unwrap());
    }

    pub fn fail(&self, message: &str) {
        *self.answer.lock().unwrap() = Err(message.to_string());
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<IpAddr> {
        *self.calls.lock().unwrap() += 1;
        self.answer
            .lock()
            .unwrap()
            .clone()
            .map_err(Error::ip_source)
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A Notifier that records every delivered event
#[derive(Clone)]
pub struct RecordingNotifier {
    verify_ok: bool,
    deliver_ok: bool,
    verify_calls: Arc<Mutex<usize>>,
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn accepting() -> Self {
        Self::new(true, true)
    }

    pub fn rejecting_key() -> Self {
        Self::new(false, true)
    }

    pub fn failing_delivery() -> Self {
        Self::new(true, false)
    }

    fn new(verify_ok: bool, deliver_ok: bool) -> Self {
        Self {
            verify_ok,
            deliver_ok,
            verify_calls: Arc::new(Mutex::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// (title, description) pairs, in delivery order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.sent().into_iter().map(|(title, _)| title).collect()
    }

    pub fn verify_calls(&self) -> usize {
        *self.verify_calls.lock().unwrap()
    }

    pub fn gate(&self) -> NotifierGate {
        NotifierGate::pending(Box::new(self.clone()))
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn verify(&self) -> Result<()> {
        *self.verify_calls.lock().unwrap() += 1;
        if self.verify_ok {
            Ok(())
        } else {
            Err(Error::notification("invalid API key"))
        }
    }

    async fn notify(&self, event: &str, description: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((event.to_string(), description.to_string()));
        if self.deliver_ok {
            Ok(())
        } else {
            Err(Error::notification("service unavailable"))
        }
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// A Clock pinned to one instant
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2024-01-02T03:04:05Z
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
}

pub fn a_record(name: &str, value: &str, editable: bool) -> DnsRecord {
    DnsRecord {
        name: name.to_string(),
        record_type: "A".to_string(),
        value: value.to_string(),
        editable,
        comment: None,
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(record_names: &[&str]) -> DdnsConfig {
    let mut config = DdnsConfig::new(
        ProviderConfig::dreamhost("test-key-0123456789"),
        record_names.iter().map(|name| RecordConfig::new(*name)).collect(),
    );
    config.engine = EngineConfig {
        update_interval_minutes: 1,
        comment: CommentTemplate::new("Last updated by X: {date}"),
    };
    config
}

/// Build an engine over the given doubles with a pinned clock
pub fn engine(
    provider: &RecordingProvider,
    ip_source: &ScriptedIpSource,
    notifier: NotifierGate,
    config: &DdnsConfig,
) -> DdnsEngine {
    DdnsEngine::new(
        Box::new(provider.clone()),
        Box::new(ip_source.clone()),
        notifier,
        config,
    )
    .expect("engine construction succeeds")
    .with_clock(Box::new(FixedClock(fixed_instant())))
}
