//! # Error Handling
//!
//! Error types for the meshcred credential manager, built on `thiserror`.
//! The top-level [`MeshcredError`] is what public operations return;
//! persistence has its own finer-grained [`PersistError`].

pub mod persist;
pub mod types;

pub use persist::PersistError;
pub use types::{MeshcredError, Result};
