//! The certificate-authority capability consumed by the manager.

use async_trait::async_trait;

use super::error::Result;
use super::types::{CaRoot, LeafCertificate};

/// Certificate-authority operations the credential loop depends on.
///
/// Implementations must be thread-safe (`Send + Sync`) and suitable for use
/// in async contexts. Any transport or application failure is returned as an
/// error; the manager treats every error from these calls as a retryable
/// failure of that fetch kind.
#[async_trait]
pub trait CaClient: Send + Sync + std::fmt::Debug {
    /// List the known root CAs and return the one marked active.
    ///
    /// # Errors
    ///
    /// - [`CaError::NoActiveRoot`](super::CaError::NoActiveRoot) if no root
    ///   is marked active
    /// - [`CaError::Transport`](super::CaError::Transport) /
    ///   [`CaError::UnexpectedStatus`](super::CaError::UnexpectedStatus) on
    ///   request failure
    async fn fetch_active_root(&self) -> Result<CaRoot>;

    /// Fetch (issuing if necessary) a leaf certificate for the named service.
    async fn fetch_leaf(&self, service: &str) -> Result<LeafCertificate>;
}
