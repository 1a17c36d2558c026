//! Error types for certificate-authority requests.

use thiserror::Error;

/// Result type for certificate-authority operations.
pub type Result<T> = std::result::Result<T, CaError>;

/// Errors raised by the certificate-authority client.
///
/// Apart from [`CaError::InvalidAddress`], every variant is a transient
/// failure of a single fetch and is retried by the manager under that fetch
/// kind's budget.
#[derive(Error, Debug)]
pub enum CaError {
    /// The configured certificate-authority address is not a valid URL.
    #[error("Invalid certificate authority address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// The request could not be sent or the response body not read.
    #[error("Certificate authority request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The certificate authority answered with a non-success status.
    #[error("Certificate authority returned status {status} for {path}")]
    UnexpectedStatus { status: u16, path: String },

    /// The response body could not be decoded.
    #[error("Failed to decode certificate authority response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The root listing contained no root marked active.
    #[error("Certificate authority returned no active root certificate")]
    NoActiveRoot,
}

impl CaError {
    /// Create an invalid-address error.
    pub fn invalid_address(address: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidAddress { address: address.into(), source }
    }

    /// Create an unexpected-status error.
    pub fn unexpected_status(status: u16, path: impl Into<String>) -> Self {
        Self::UnexpectedStatus { status, path: path.into() }
    }
}

impl From<reqwest::Error> for CaError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport { source }
    }
}
