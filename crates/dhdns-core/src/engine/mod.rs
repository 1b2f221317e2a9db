//! Core dhdns engine
//!
//! The DdnsEngine is responsible for:
//! - Fetching the provider's A records once per cycle
//! - Resolving the public IP (with last-known fallback)
//! - Reconciling every configured domain against the snapshot
//! - Reporting outcomes through the notifier gate
//!
//! ## Architecture
//!
//! ```text
//!  ┌─────────────┐   ┌─────────────┐
//!  │ DnsProvider │   │ IpResolver  │
//!  │ (list)      │   │ (resolve)   │
//!  └──────┬──────┘   └──────┬──────┘
//!         │ RecordSnapshot  │ Resolution
//!         └────────┬────────┘
//!                  ▼
//!          ┌──────────────┐       ┌──────────────┐
//!          │  DdnsEngine  │──────▶│ NotifierGate │
//!          └──────┬───────┘       └──────────────┘
//!                 │ remove / add
//!                 ▼
//!          ┌─────────────┐
//!          │ DnsProvider │
//!          └─────────────┘
//! ```
//!
//! ## Cycle
//!
//! 1. List records, keep A records (empty snapshot on failure)
//! 2. Resolve the IP; skip the cycle if nothing valid is available
//! 3. Per domain: not editable → skip; already current → no-op;
//!    otherwise delete the old record (if any), then create the new one
//! 4. Remember the IP the cycle ran with
//! 5. Sleep for the update interval

pub mod resolver;

pub use resolver::{IpResolver, Resolution};

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::comment::CommentTemplate;
use crate::config::DdnsConfig;
use crate::error::Result;
use crate::notify::{DomainEvent, NotifierGate, NotifierState};
use crate::state::{CurrentIp, Domain, ProviderRecord, RecordSnapshot};
use crate::time::{Clock, SystemClock, format_timestamp};
use crate::traits::{DnsProvider, IpSource, RecordType};

/// What happened to one domain during a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainOutcome {
    /// Existing record is read-only; nothing was sent
    NotEditable,

    /// Existing record already points at the resolved IP
    UpToDate,

    /// A new record was created (after removing `previous`, if any)
    Created { previous: Option<String> },

    /// Removing the old record failed; no create was attempted
    DeleteFailed { error: String },

    /// Creating the record failed
    CreateFailed { error: String },
}

/// Summary of one reconciliation cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// The address the cycle ran with (or why it was skipped)
    pub resolution: Resolution,

    /// Per-domain outcome, in configuration order; empty when skipped
    pub outcomes: Vec<(String, DomainOutcome)>,
}

impl CycleReport {
    /// True when no reconciliation ran this cycle
    pub fn skipped(&self) -> bool {
        self.resolution.ip().is_none()
    }

    /// Outcome for one domain
    pub fn outcome(&self, domain: &str) -> Option<&DomainOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == domain)
            .map(|(_, outcome)| outcome)
    }

    /// Number of domains with a failed delete or create
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| {
                matches!(
                    outcome,
                    DomainOutcome::DeleteFailed { .. } | DomainOutcome::CreateFailed { .. }
                )
            })
            .count()
    }
}

/// Core dhdns engine
///
/// Owns all state of the poll loop: the managed domains, the last known IP,
/// the provider, the IP resolver and the notifier gate.
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`], which verifies the notifier once and
///    then loops until a shutdown signal is received
///
/// ## Threading
///
/// One cycle runs at a time and every call inside it is awaited in order.
/// The only suspension between cycles is the update-interval sleep.
pub struct DdnsEngine {
    /// DNS provider for listing and writing records
    provider: Box<dyn DnsProvider>,

    /// IP lookup with classification and fallback
    resolver: IpResolver,

    /// Optional notifications
    notifier: NotifierGate,

    /// Source of "now" for comments and update stamps
    clock: Box<dyn Clock>,

    /// Managed domains, in configuration order
    domains: Vec<Domain>,

    /// Comment attached to created records
    comment: CommentTemplate,

    /// Address the last reconciling cycle ran with
    current_ip: CurrentIp,

    /// Sleep between cycles
    update_interval: Duration,
}

impl DdnsEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `provider`: DNS provider implementation
    /// - `ip_source`: IP source implementation
    /// - `notifier`: Notifier gate (use `NotifierGate::Unconfigured` for none)
    /// - `config`: dhdns configuration, validated here
    pub fn new(
        provider: Box<dyn DnsProvider>,
        ip_source: Box<dyn IpSource>,
        notifier: NotifierGate,
        config: &DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        let domains = config
            .records
            .iter()
            .map(|record| {
                info!("Domain added: {}", record.name);
                Domain::new(record.name.clone())
            })
            .collect();

        Ok(Self {
            provider,
            resolver: IpResolver::new(ip_source),
            notifier,
            clock: Box::new(SystemClock),
            domains,
            comment: config.engine.comment.clone(),
            current_ip: CurrentIp::unset(),
            update_interval: config.engine.update_interval(),
        })
    }

    /// Replace the clock (tests pin timestamps with this)
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Start with a known IP instead of an unset one
    pub fn with_last_known_ip(mut self, ip: Ipv4Addr) -> Self {
        self.current_ip = CurrentIp::known(ip);
        self
    }

    /// Address the last reconciling cycle ran with
    pub fn current_ip(&self) -> Option<Ipv4Addr> {
        self.current_ip.get()
    }

    /// Managed domains
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn notifier_state(&self) -> NotifierState {
        self.notifier.state()
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Run the one-shot notifier key verification
    ///
    /// Has no effect unless the gate is still pending.
    pub async fn verify_notifier(&mut self) {
        let gate = std::mem::replace(&mut self.notifier, NotifierGate::Unconfigured);
        self.notifier = gate.verify().await;
        info!("Notifications {}", self.notifier.state());
    }

    /// Run the engine until SIGINT/ctrl-c
    pub async fn run(&mut self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to wait for ctrl-c: {}", e);
            }
        })
        .await
    }

    /// Run the engine until `shutdown_rx` fires or its sender is dropped
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: tokio::sync::oneshot::Receiver<()>,
    ) -> Result<()> {
        self.run_until(async {
            let _ = shutdown_rx.await;
        })
        .await
    }

    /// Run the engine until `shutdown` completes
    ///
    /// The notifier is verified once, then cycles run back to back with the
    /// update interval in between. `shutdown` is only observed during the
    /// sleep, so a cycle in progress always finishes.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.verify_notifier().await;

        tokio::pin!(shutdown);
        loop {
            let report = self.run_cycle().await;
            debug!("Cycle report: {:?}", report);

            info!(
                "Done checking/updating domains. Sleeping for {} minutes.",
                self.update_interval.as_secs() / 60
            );

            tokio::select! {
                _ = tokio::time::sleep(self.update_interval) => {}
                _ = &mut shutdown => {
                    info!("Shutdown signal received, engine stopped");
                    return Ok(());
                }
            }
        }
    }

    /// Fetch the provider's A records
    ///
    /// A failed listing yields an empty snapshot; the next cycle is the retry.
    pub async fn fetch_records(&self) -> RecordSnapshot {
        match self.provider.list_records().await {
            Ok(records) => {
                let snapshot = RecordSnapshot::from_records(records);
                debug!(
                    "{} A record(s) listed by {}: {:?}",
                    snapshot.len(),
                    self.provider.provider_name(),
                    snapshot
                );
                snapshot
            }
            Err(e) => {
                error!(
                    "Error reported by {} while listing records: {}",
                    self.provider.provider_name(),
                    e
                );
                RecordSnapshot::empty()
            }
        }
    }

    /// Run one full reconciliation cycle
    pub async fn run_cycle(&mut self) -> CycleReport {
        let snapshot = self.fetch_records().await;
        let resolution = self.resolver.resolve(self.current_ip.get()).await;

        let Some(ip) = resolution.ip() else {
            return CycleReport {
                resolution,
                outcomes: Vec::new(),
            };
        };

        let mut domains = std::mem::take(&mut self.domains);
        let mut outcomes = Vec::with_capacity(domains.len());
        for domain in &mut domains {
            let outcome = self
                .reconcile_domain(domain, snapshot.get(domain.name()), ip)
                .await;
            outcomes.push((domain.name().to_string(), outcome));
        }
        self.domains = domains;

        self.current_ip.set(ip);

        CycleReport {
            resolution,
            outcomes,
        }
    }

    /// Bring one domain in line with `ip`
    async fn reconcile_domain(
        &self,
        domain: &mut Domain,
        existing: Option<&ProviderRecord>,
        ip: Ipv4Addr,
    ) -> DomainOutcome {
        let name = domain.name().to_string();

        if let Some(record) = existing {
            if !record.editable {
                warn!("Domain {} is not editable, skipping.", name);
                self.notifier
                    .notify(&DomainEvent::NotEditable { domain: name })
                    .await;
                return DomainOutcome::NotEditable;
            }

            if record.points_at(IpAddr::V4(ip)) {
                info!("No update needed for {}.", name);
                return DomainOutcome::UpToDate;
            }

            info!(
                "New IP detected for {}: [{}]. Deleting existing record [{}].",
                name, ip, record.value
            );
            if let Err(e) = self
                .provider
                .remove_record(&name, RecordType::A, &record.value)
                .await
            {
                error!("Error deleting domain {}: {}.", name, e);
                let error = e.message();
                self.notifier
                    .notify(&DomainEvent::DeleteFailed {
                        domain: name,
                        value: record.value.clone(),
                        error: error.clone(),
                    })
                    .await;
                return DomainOutcome::DeleteFailed { error };
            }
            info!("Successfully deleted domain {}.", name);
        } else {
            info!("Domain {} does not exist.", name);
        }

        let previous = existing.map(|record| record.value.clone());
        let now = self.clock.now();
        let comment = self.comment.render(now);

        match self
            .provider
            .add_record(&name, IpAddr::V4(ip), comment.as_deref())
            .await
        {
            Ok(()) => {
                domain.mark_updated(now);
                info!(
                    "Successfully added domain {} with IP [{}] at {}.",
                    name,
                    ip,
                    format_timestamp(now)
                );
                self.notifier
                    .notify(&DomainEvent::Created {
                        domain: name,
                        ip,
                        previous: previous.clone(),
                    })
                    .await;
                DomainOutcome::Created { previous }
            }
            Err(e) => {
                error!("Error adding domain {}: {}.", name, e);
                let error = e.message();
                self.notifier
                    .notify(&DomainEvent::CreateFailed {
                        domain: name,
                        ip,
                        error: error.clone(),
                    })
                    .await;
                DomainOutcome::CreateFailed { error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_report_has_no_ip() {
        let report = CycleReport {
            resolution: Resolution::Unresolved {
                reason: "timeout".to_string(),
            },
            outcomes: Vec::new(),
        };
        assert!(report.skipped());
        assert_eq!(report.failures(), 0);
    }

    #[test]
    fn report_counts_failures() {
        let report = CycleReport {
            resolution: Resolution::Resolved(Ipv4Addr::new(203, 0, 113, 5)),
            outcomes: vec![
                ("a.example.com".to_string(), DomainOutcome::UpToDate),
                (
                    "b.example.com".to_string(),
                    DomainOutcome::DeleteFailed {
                        error: "no_such_record".to_string(),
                    },
                ),
                (
                    "c.example.com".to_string(),
                    DomainOutcome::CreateFailed {
                        error: "record_already_exists".to_string(),
                    },
                ),
            ],
        };
        assert!(!report.skipped());
        assert_eq!(report.failures(), 2);
        assert_eq!(report.outcome("a.example.com"), Some(&DomainOutcome::UpToDate));
        assert_eq!(report.outcome("missing.example.com"), None);
    }
}
