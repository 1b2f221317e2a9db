//! Error types for the dhdns system
//!
//! Every fallible operation in the workspace returns [`Result`]. A value of
//! `Err(Error)` is the failure half of the tagged outcome: [`Error::kind`]
//! names the class of failure and the `Display` impl carries the message.

use thiserror::Error;

/// Result type alias for dhdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
///
/// The reconciler only branches on this tag; the message is for logs and
/// notification descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Endpoint unreachable, timed out, or answered with a non-2xx status
    Transport,
    /// A value failed validation (e.g. a non-public IP address)
    Validation,
    /// A well-formed provider response reporting failure
    Provider,
    /// Push notification delivery or verification failed
    Notification,
    /// Invalid or missing configuration
    Config,
    /// Anything else
    Other,
}

/// Core error type for the dhdns system
#[derive(Error, Debug)]
pub enum Error {
    /// IP source-related errors (echo service unreachable, unparsable body)
    #[error("IP source error: {0}")]
    IpSource(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// A value was rejected by validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider-reported logical error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error description as reported by the provider
        message: String,
    },

    /// Notification service errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IpSource(_) | Error::Http(_) => ErrorKind::Transport,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Provider { .. } | Error::Json(_) => ErrorKind::Provider,
            Error::Notification(_) => ErrorKind::Notification,
            Error::Config(_) => ErrorKind::Config,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Message without the variant prefix
    ///
    /// Used for notification descriptions, where the provider's own wording
    /// (e.g. `no_such_record`) is what the reader wants to see.
    pub fn message(&self) -> String {
        match self {
            Error::IpSource(msg)
            | Error::Http(msg)
            | Error::Validation(msg)
            | Error::Notification(msg)
            | Error::Config(msg)
            | Error::Other(msg) => msg.clone(),
            Error::Provider { message, .. } => message.clone(),
            Error::Json(err) => err.to_string(),
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
