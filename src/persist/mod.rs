//! # Credential Persistence
//!
//! Durable storage for the fetched gateway identity. The manager writes
//! through the [`CertificateSink`] trait so the target and mechanics can be
//! substituted (tests install sinks that assert on the exact material
//! received); [`DirectoryCertificateSink`] is the production implementation
//! that publishes three PEM files atomically into a directory.

pub mod fs;
pub mod sink;

pub use fs::DirectoryCertificateSink;
pub use sink::CertificateSink;
