//! # Observability
//!
//! Structured logging setup for the credential manager. All components emit
//! `tracing` events; this module installs the global subscriber from
//! [`ObservabilityConfig`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::errors::{MeshcredError, Result};

/// Initialize the global tracing subscriber.
///
/// The filter uses `RUST_LOG` when set and falls back to the configured
/// level; output is human-readable text or JSON lines per the config.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| {
            MeshcredError::config(format!("Invalid log filter '{}': {}", config.log_level, e))
        })?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| {
        MeshcredError::config_with_source("Failed to install tracing subscriber", e.into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_filter() {
        // Make sure the fallback path is taken regardless of the test env.
        std::env::remove_var("RUST_LOG");
        let config = ObservabilityConfig {
            log_level: "not=a=filter".to_string(),
            json_logs: false,
        };
        assert!(init_tracing(&config).is_err());
    }
}
