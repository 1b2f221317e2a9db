//! Notification gate
//!
//! Wraps an optional [`Notifier`] in the one-shot verification lifecycle:
//!
//! ```text
//!  Unconfigured (no key)            terminal
//!  VerifyPending ──verify ok──▶ Enabled
//!        │
//!        └──────verify err──▶ Disabled   terminal
//! ```
//!
//! Only an `Enabled` gate delivers anything. Delivery failures are logged and
//! swallowed.

use std::fmt;
use std::net::Ipv4Addr;

use tracing::{debug, info, warn};

use crate::traits::Notifier;

/// Observable state of a [`NotifierGate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    Unconfigured,
    VerifyPending,
    Enabled,
    Disabled,
}

impl fmt::Display for NotifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotifierState::Unconfigured => "unconfigured",
            NotifierState::VerifyPending => "verify pending",
            NotifierState::Enabled => "enabled",
            NotifierState::Disabled => "disabled",
        };
        f.write_str(name)
    }
}

/// Optional notifier plus its verification state
pub enum NotifierGate {
    Unconfigured,
    VerifyPending(Box<dyn Notifier>),
    Enabled(Box<dyn Notifier>),
    Disabled,
}

impl NotifierGate {
    /// Gate for a configured notifier, awaiting verification
    pub fn pending(notifier: Box<dyn Notifier>) -> Self {
        NotifierGate::VerifyPending(notifier)
    }

    /// Gate built from an optional notifier
    pub fn from_option(notifier: Option<Box<dyn Notifier>>) -> Self {
        match notifier {
            Some(notifier) => NotifierGate::pending(notifier),
            None => NotifierGate::Unconfigured,
        }
    }

    pub fn state(&self) -> NotifierState {
        match self {
            NotifierGate::Unconfigured => NotifierState::Unconfigured,
            NotifierGate::VerifyPending(_) => NotifierState::VerifyPending,
            NotifierGate::Enabled(_) => NotifierState::Enabled,
            NotifierGate::Disabled => NotifierState::Disabled,
        }
    }

    /// Run the one-shot key verification
    ///
    /// Only `VerifyPending` moves; every other state is returned unchanged.
    pub async fn verify(self) -> Self {
        match self {
            NotifierGate::VerifyPending(notifier) => match notifier.verify().await {
                Ok(()) => {
                    info!("{} API key verified, notifications enabled", notifier.notifier_name());
                    NotifierGate::Enabled(notifier)
                }
                Err(e) => {
                    warn!(
                        "{} API key verification failed, notifications disabled: {}",
                        notifier.notifier_name(),
                        e
                    );
                    NotifierGate::Disabled
                }
            },
            other => other,
        }
    }

    /// Deliver `event` if the gate is enabled
    ///
    /// Returns whether the notification was delivered.
    pub async fn notify(&self, event: &DomainEvent) -> bool {
        let NotifierGate::Enabled(notifier) = self else {
            debug!("Notifications {}, not sending: {}", self.state(), event.title());
            return false;
        };

        match notifier.notify(&event.title(), &event.description()).await {
            Ok(()) => {
                debug!("Notification sent: {}", event.title());
                true
            }
            Err(e) => {
                warn!("Failed to send notification '{}': {}", event.title(), e);
                false
            }
        }
    }
}

impl fmt::Debug for NotifierGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NotifierGate").field(&self.state()).finish()
    }
}

/// Reconciliation outcomes that produce a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// The provider marks the existing record read-only
    NotEditable { domain: String },

    /// Removing the stale record failed; nothing was created
    DeleteFailed {
        domain: String,
        value: String,
        error: String,
    },

    /// A record pointing at `ip` was created
    Created {
        domain: String,
        ip: Ipv4Addr,
        previous: Option<String>,
    },

    /// Creating the record failed
    CreateFailed {
        domain: String,
        ip: Ipv4Addr,
        error: String,
    },
}

impl DomainEvent {
    /// Short event title
    pub fn title(&self) -> String {
        match self {
            DomainEvent::NotEditable { .. } => "Record not editable".to_string(),
            DomainEvent::DeleteFailed { .. } => "Error deleting record".to_string(),
            DomainEvent::Created { .. } => "Record updated".to_string(),
            DomainEvent::CreateFailed { .. } => "Error adding record".to_string(),
        }
    }

    /// Longer description
    pub fn description(&self) -> String {
        match self {
            DomainEvent::NotEditable { domain } => {
                format!("Domain {domain} is not editable, skipping.")
            }
            DomainEvent::DeleteFailed {
                domain,
                value,
                error,
            } => format!("Error deleting domain {domain} with IP [{value}]: {error}."),
            DomainEvent::Created {
                domain,
                ip,
                previous: Some(previous),
            } => format!("Successfully updated domain {domain} from [{previous}] to [{ip}]."),
            DomainEvent::Created {
                domain,
                ip,
                previous: None,
            } => format!("Successfully added domain {domain} with IP [{ip}]."),
            DomainEvent::CreateFailed { domain, ip, error } => {
                format!("Error adding domain {domain} with IP [{ip}]: {error}.")
            }
        }
    }
}
