// # Notifier Trait
//
// Defines the interface for push-notification services.
//
// ## Implementations
//
// - Prowl: `dhdns-notify-prowl` crate
//
// Notifiers never see reconciliation state. The engine decides when to
// notify through `notify::NotifierGate`, which also owns the one-shot key
// verification.

use async_trait::async_trait;

/// Trait for push-notification services
///
/// # Trust Level: Untrusted
///
/// Delivery is best-effort. Errors returned here are logged by the caller
/// and never change a reconciliation outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Verify the configured credential with the service
    ///
    /// Called once at startup. A failure disables notifications for the
    /// rest of the process lifetime.
    async fn verify(&self) -> Result<(), crate::Error>;

    /// Send one notification
    ///
    /// # Parameters
    ///
    /// - `event`: Short event title
    /// - `description`: Longer description of what happened
    async fn notify(&self, event: &str, description: &str) -> Result<(), crate::Error>;

    /// Get the notifier name (for logging/debugging)
    fn notifier_name(&self) -> &'static str;
}
