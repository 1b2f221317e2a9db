//! Contract Test: Per-Domain Reconciliation
//!
//! Verifies the decision order the engine applies to every domain:
//! not editable → skip, already current → no-op, otherwise delete then create.
//!
//! Constraints verified:
//! - Read-only records are never written, whatever the IP
//! - Current records are never written
//! - Delete always precedes create, and a failed delete blocks the create
//! - Comments carry the creation timestamp

mod common;

use common::*;
use dhdns_core::{DomainOutcome, NotifierGate, Resolution};
use std::net::Ipv4Addr;

#[tokio::test]
async fn missing_record_is_created_without_delete() {
    // Scenario A: nothing listed, public IP resolved → one create, no delete
    let provider = RecordingProvider::new();
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let config = minimal_config(&[DOMAIN]);
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    let report = engine.run_cycle().await;

    assert_eq!(
        report.resolution,
        Resolution::Resolved(Ipv4Addr::new(203, 0, 113, 5))
    );
    assert_eq!(
        provider.writes(),
        vec![ProviderCall::Add {
            name: DOMAIN.to_string(),
            value: "203.0.113.5".to_string(),
            comment: Some("Last updated by X: 2024-01-02T03:04:05Z".to_string()),
        }]
    );
    assert_eq!(
        report.outcome(DOMAIN),
        Some(&DomainOutcome::Created { previous: None })
    );
}

#[tokio::test]
async fn current_record_is_left_alone() {
    // Scenario B: listed value equals resolved IP → zero writes
    let provider = RecordingProvider::new().with_a_record(DOMAIN, "203.0.113.5", true);
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let config = minimal_config(&[DOMAIN]);
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    let report = engine.run_cycle().await;

    assert!(provider.writes().is_empty());
    assert_eq!(report.outcome(DOMAIN), Some(&DomainOutcome::UpToDate));
    assert_eq!(engine.domains()[0].last_update(), None);
}

#[tokio::test]
async fn read_only_record_is_never_written() {
    let provider = RecordingProvider::new().with_a_record(DOMAIN, "198.51.100.9", false);
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let config = minimal_config(&[DOMAIN]);
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    let report = engine.run_cycle().await;

    assert!(provider.writes().is_empty());
    assert_eq!(report.outcome(DOMAIN), Some(&DomainOutcome::NotEditable));
}

#[tokio::test]
async fn read_only_wins_over_matching_value() {
    let provider = RecordingProvider::new().with_a_record(DOMAIN, "203.0.113.5", false);
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let config = minimal_config(&[DOMAIN]);
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    let report = engine.run_cycle().await;

    assert_eq!(report.outcome(DOMAIN), Some(&DomainOutcome::NotEditable));
}

#[tokio::test]
async fn stale_record_is_deleted_before_create() {
    let provider = RecordingProvider::new().with_a_record(DOMAIN, "198.51.100.9", true);
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let config = minimal_config(&[DOMAIN]);
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    let report = engine.run_cycle().await;

    assert_eq!(
        provider.writes(),
        vec![
            ProviderCall::Remove {
                name: DOMAIN.to_string(),
                value: "198.51.100.9".to_string(),
            },
            ProviderCall::Add {
                name: DOMAIN.to_string(),
                value: "203.0.113.5".to_string(),
                comment: Some("Last updated by X: 2024-01-02T03:04:05Z".to_string()),
            },
        ]
    );
    assert_eq!(
        report.outcome(DOMAIN),
        Some(&DomainOutcome::Created {
            previous: Some("198.51.100.9".to_string()),
        })
    );
    assert_eq!(
        engine.domains()[0].last_update_display().as_deref(),
        Some("2024-01-02T03:04:05Z")
    );
}

#[tokio::test]
async fn failed_delete_blocks_create() {
    let provider = RecordingProvider::new()
        .with_a_record(DOMAIN, "198.51.100.9", true)
        .fail_remove(DOMAIN);
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let config = minimal_config(&[DOMAIN]);
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    let report = engine.run_cycle().await;

    assert_eq!(
        provider.writes(),
        vec![ProviderCall::Remove {
            name: DOMAIN.to_string(),
            value: "198.51.100.9".to_string(),
        }]
    );
    assert_eq!(
        report.outcome(DOMAIN),
        Some(&DomainOutcome::DeleteFailed {
            error: "no_such_record".to_string(),
        })
    );
    assert_eq!(engine.domains()[0].last_update(), None);
}

#[tokio::test]
async fn failed_create_leaves_domain_unstamped() {
    let provider = RecordingProvider::new().fail_add(DOMAIN);
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let config = minimal_config(&[DOMAIN]);
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    let report = engine.run_cycle().await;

    assert!(matches!(
        report.outcome(DOMAIN),
        Some(DomainOutcome::CreateFailed { .. })
    ));
    assert_eq!(report.failures(), 1);
    assert_eq!(engine.domains()[0].last_update(), None);
}

#[tokio::test]
async fn one_failing_domain_does_not_stop_the_others() {
    let provider = RecordingProvider::new()
        .with_a_record("a.example.com", "198.51.100.9", true)
        .with_a_record("b.example.com", "198.51.100.9", true)
        .fail_remove("a.example.com");
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let config = minimal_config(&["a.example.com", "b.example.com"]);
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    let report = engine.run_cycle().await;

    assert!(matches!(
        report.outcome("a.example.com"),
        Some(DomainOutcome::DeleteFailed { .. })
    ));
    assert!(matches!(
        report.outcome("b.example.com"),
        Some(DomainOutcome::Created { .. })
    ));
    assert_eq!(provider.writes_for("a.example.com").len(), 1);
    assert_eq!(provider.writes_for("b.example.com").len(), 2);
}

#[tokio::test]
async fn empty_comment_template_sends_no_comment() {
    let provider = RecordingProvider::new();
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let mut config = minimal_config(&[DOMAIN]);
    config.engine.comment = dhdns_core::CommentTemplate::none();
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    engine.run_cycle().await;

    assert_eq!(
        provider.writes(),
        vec![ProviderCall::Add {
            name: DOMAIN.to_string(),
            value: "203.0.113.5".to_string(),
            comment: None,
        }]
    );
}

#[tokio::test]
async fn non_a_records_do_not_count_as_existing() {
    let provider = RecordingProvider::new().with_record(dhdns_core::traits::DnsRecord {
        name: DOMAIN.to_string(),
        record_type: "CNAME".to_string(),
        value: "home.example.net".to_string(),
        editable: false,
        comment: None,
    });
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let config = minimal_config(&[DOMAIN]);
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    let report = engine.run_cycle().await;

    assert_eq!(
        report.outcome(DOMAIN),
        Some(&DomainOutcome::Created { previous: None })
    );
}

#[tokio::test]
async fn unlisted_domains_in_account_are_ignored() {
    let provider = RecordingProvider::new()
        .with_a_record(DOMAIN, "203.0.113.5", true)
        .with_a_record("other.example.com", "192.0.2.1", true);
    let ip_source = ScriptedIpSource::answering("203.0.113.5");
    let config = minimal_config(&[DOMAIN]);
    let mut engine = engine(&provider, &ip_source, NotifierGate::Unconfigured, &config);

    let report = engine.run_cycle().await;

    assert!(provider.writes().is_empty());
    assert_eq!(report.outcomes.len(), 1);
}
