//! # Certificate Authority Client
//!
//! Client-side view of the control plane's certificate-authority API. The
//! manager consumes it through the [`CaClient`] trait, which exposes the two
//! operations the credential loop needs: fetch the active root CA and fetch
//! a leaf certificate for a named service identity. [`HttpCaClient`] is the
//! production implementation against the control-plane agent endpoints.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::CaClient;
pub use error::CaError;
pub use http::HttpCaClient;
pub use types::{CaRoot, CaRootList, LeafCertificate};
