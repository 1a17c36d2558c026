//! # Meshcred
//!
//! Meshcred is the credential-lifecycle component of a service-mesh gateway:
//! it continuously obtains and renews the TLS identity (root CA certificate
//! plus leaf client certificate and private key) the gateway uses to
//! authenticate to its control plane, and persists that identity to a
//! well-known directory so co-located processes (e.g. a proxy data plane)
//! can consume it.
//!
//! ## Architecture
//!
//! ```text
//! Control-Plane CA API → CA Client → Certificate Manager → Persistence Sink
//!                                          ↓
//!                                   Readiness Signal
//! ```
//!
//! ## Core Components
//!
//! - **CA Client**: fetches the active root CA and per-service leaf
//!   certificates over the control plane's HTTP API
//! - **Certificate Manager**: the fetch/retry/persist/renew loop with
//!   independent per-kind retry budgets and a fire-once readiness signal
//! - **Persistence Sink**: atomic three-file writer, pluggable for tests
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use meshcred::ca::HttpCaClient;
//! use meshcred::{CaConfig, CertManager, CertManagerOptions, Result};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Arc::new(HttpCaClient::new(&CaConfig::default())?);
//!     let manager = CertManager::new(Some(client), "gateway", CertManagerOptions::default());
//!     manager.manage(CancellationToken::new()).await
//! }
//! ```

pub mod ca;
pub mod cli;
pub mod config;
pub mod errors;
pub mod manager;
pub mod observability;
pub mod persist;
pub mod secrets;

// Re-export commonly used types and traits
pub use config::{CaConfig, CertManagerOptions, ObservabilityConfig};
pub use errors::{MeshcredError, Result};
pub use manager::CertManager;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "meshcred");
    }
}
