//! Handling of sensitive material.
//!
//! The gateway identity includes a private key, and the control-plane client
//! may carry a bearer token. Both are wrapped in [`SecretString`] so they can
//! never leak through logs, `Debug` output, or serialized structures.

pub mod types;

pub use types::SecretString;
