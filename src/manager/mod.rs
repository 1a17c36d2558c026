//! # Certificate Manager
//!
//! The credential-lifecycle core: a long-lived loop that fetches the active
//! root CA and a leaf certificate for the gateway's service identity,
//! persists both through a pluggable sink, and schedules renewal from the
//! leaf's validity window. Root fetches, leaf fetches, and persistence each
//! carry an independent consecutive-failure budget; exhausting any one of
//! them is fatal. A fire-once readiness signal lets any number of callers
//! block until the first successful write.

pub mod cert_manager;
pub mod retry;

pub use cert_manager::CertManager;
pub use retry::{FetchOperation, RetryBudget, RetryConfig};
