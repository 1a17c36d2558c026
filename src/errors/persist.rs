use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while persisting credential artifacts to disk.
///
/// Every variant carries the path involved so operators can tell which of
/// the three artifacts (root CA, client certificate, private key) was being
/// handled when the write failed.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The target directory could not be created.
    #[error("Failed to create credential directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A staged temporary file could not be written.
    #[error("Failed to stage credential file {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A staged file could not be published to its final name.
    #[error("Failed to commit credential file {path}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
