//! Directory-backed certificate sink with atomic publication.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::ca::{CaRoot, LeafCertificate};
use crate::config::CertManagerOptions;
use crate::errors::PersistError;

use super::sink::CertificateSink;

/// Writes the gateway identity as three PEM files into a directory.
///
/// All three artifacts are staged to uniquely named temporary files first
/// and only then published via `rename`, so a reader of the directory sees
/// either the previous identity or the new one in full, never a torn mix
/// or a truncated file. The private key is restricted to owner read/write
/// on Unix.
pub struct DirectoryCertificateSink {
    directory: PathBuf,
    root_filename: String,
    cert_filename: String,
    key_filename: String,
}

impl DirectoryCertificateSink {
    /// Build a sink targeting the directory and filenames in `options`.
    pub fn new(options: &CertManagerOptions) -> Self {
        Self {
            directory: options.directory.clone(),
            root_filename: options.root_filename.clone(),
            cert_filename: options.cert_filename.clone(),
            key_filename: options.key_filename.clone(),
        }
    }

    async fn stage(&self, name: &str, contents: &[u8]) -> Result<PathBuf, PersistError> {
        let staged = self.directory.join(format!(".{}.{}.tmp", name, Uuid::new_v4()));
        fs::write(&staged, contents)
            .await
            .map_err(|source| PersistError::Stage { path: staged.clone(), source })?;
        Ok(staged)
    }

    async fn commit(&self, staged: &Path, name: &str) -> Result<(), PersistError> {
        let target = self.directory.join(name);
        fs::rename(staged, &target)
            .await
            .map_err(|source| PersistError::Commit { path: target, source })
    }
}

#[async_trait]
impl CertificateSink for DirectoryCertificateSink {
    async fn write(&self, root: &CaRoot, leaf: &LeafCertificate) -> Result<(), PersistError> {
        fs::create_dir_all(&self.directory).await.map_err(|source| {
            PersistError::CreateDirectory { path: self.directory.clone(), source }
        })?;

        // Stage everything before publishing anything, so a failure part-way
        // through staging leaves the published files untouched.
        let staged_root = self.stage(&self.root_filename, root.root_cert_pem.as_bytes()).await?;
        let staged_cert = self.stage(&self.cert_filename, leaf.cert_pem.as_bytes()).await?;
        let staged_key =
            self.stage(&self.key_filename, leaf.private_key_pem.expose_secret().as_bytes()).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&staged_key, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|source| PersistError::Stage { path: staged_key.clone(), source })?;
        }

        self.commit(&staged_root, &self.root_filename).await?;
        self.commit(&staged_cert, &self.cert_filename).await?;
        self.commit(&staged_key, &self.key_filename).await?;

        debug!(directory = %self.directory.display(), "Persisted gateway credentials");
        Ok(())
    }
}
