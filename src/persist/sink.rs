//! The persistence capability consumed by the manager.

use async_trait::async_trait;

use crate::ca::{CaRoot, LeafCertificate};
use crate::errors::PersistError;

/// Durable writer for a fetched (root, leaf) credential pair.
///
/// A single call persists all three artifacts: root CA certificate, client
/// certificate, and client private key. Implementations must guarantee that
/// a failed or interrupted write never leaves readers with a mix of old and
/// new material.
#[async_trait]
pub trait CertificateSink: Send + Sync {
    /// Write the credential pair, replacing any previously persisted material.
    async fn write(&self, root: &CaRoot, leaf: &LeafCertificate) -> Result<(), PersistError>;
}
