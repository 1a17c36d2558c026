//! # Configuration Management
//!
//! Configuration surface for the credential manager: where the certificate
//! authority lives, where credentials are persisted, and how logging is set
//! up. Values come from CLI flags with `MESHCRED_*` environment fallbacks.

pub mod settings;

pub use settings::{CaConfig, CertManagerOptions, ObservabilityConfig};
