//! Top-level error type for meshcred operations.

use crate::ca::CaError;
use crate::errors::PersistError;
use crate::manager::FetchOperation;

/// Custom result type for meshcred operations
pub type Result<T> = std::result::Result<T, MeshcredError>;

/// Main error type for the credential manager
#[derive(thiserror::Error, Debug)]
pub enum MeshcredError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Certificate authority request failures
    #[error("Certificate authority error: {0}")]
    Ca(#[from] CaError),

    /// Credential persistence failures
    #[error("Credential persistence error: {0}")]
    Persist(#[from] PersistError),

    /// A fetch kind failed its entire consecutive-failure budget.
    ///
    /// Fatal: `manage` returns this and the loop does not restart itself.
    #[error("{operation} failed {attempts} consecutive times, giving up")]
    RetriesExhausted {
        operation: FetchOperation,
        attempts: u32,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The caller's cancellation fired before the first credential write.
    #[error("Cancelled before the initial credential write completed")]
    WaitCancelled,

    /// Internal invariant violations
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MeshcredError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a retry-exhaustion error for the given fetch kind
    pub fn retries_exhausted(
        operation: FetchOperation,
        attempts: u32,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::RetriesExhausted { operation, attempts, source: Some(Box::new(source)) }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into() }
    }
}

impl From<validator::ValidationErrors> for MeshcredError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let details: Vec<String> = field_errors
                    .iter()
                    .map(|e| e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string()))
                    .collect();
                format!("{}: {}", field, details.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::config(format!("Validation failed: {}", message))
    }
}
