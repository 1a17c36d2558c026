//! Configuration structures for the credential manager.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::errors::{MeshcredError, Result};
use crate::secrets::SecretString;

/// Default number of consecutive failures tolerated per fetch kind.
pub const DEFAULT_TRIES: u32 = 10;

/// Certificate-authority client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CaConfig {
    /// Base address of the control plane's certificate-authority API
    #[validate(length(min = 1, message = "CA address cannot be empty"))]
    pub address: String,

    /// Optional bearer token presented on every request
    pub token: Option<SecretString>,

    /// Per-request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,
}

impl Default for CaConfig {
    fn default() -> Self {
        Self { address: "http://127.0.0.1:8080".to_string(), token: None, timeout_seconds: 30 }
    }
}

impl CaConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(MeshcredError::from)?;

        Url::parse(&self.address).map_err(|e| {
            MeshcredError::config(format!("CA address '{}' is not a valid URL: {}", self.address, e))
        })?;

        Ok(())
    }
}

/// Certificate-manager options: persistence target and retry budget
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CertManagerOptions {
    /// Directory that receives the persisted credential files
    pub directory: PathBuf,

    /// Consecutive failures tolerated per fetch kind before `manage` fails
    /// fatally. `0` fails the run on the first error of any kind.
    pub tries: u32,

    /// Filename for the root CA certificate
    #[validate(length(min = 1, message = "Root filename cannot be empty"))]
    pub root_filename: String,

    /// Filename for the client certificate
    #[validate(length(min = 1, message = "Certificate filename cannot be empty"))]
    pub cert_filename: String,

    /// Filename for the client private key
    #[validate(length(min = 1, message = "Key filename cannot be empty"))]
    pub key_filename: String,
}

impl Default for CertManagerOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("/certs"),
            tries: DEFAULT_TRIES,
            root_filename: "root-ca.pem".to_string(),
            cert_filename: "client.crt".to_string(),
            key_filename: "client.key".to_string(),
        }
    }
}

impl CertManagerOptions {
    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(MeshcredError::from)?;

        self.validate_custom()
    }

    /// Custom validation beyond what the validator derive covers
    fn validate_custom(&self) -> Result<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(MeshcredError::config("Credential directory cannot be empty"));
        }

        let names = [&self.root_filename, &self.cert_filename, &self.key_filename];
        for (i, name) in names.iter().enumerate() {
            if names[i + 1..].contains(name) {
                return Err(MeshcredError::config(format!(
                    "Credential filenames must be distinct, '{}' is used twice",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log filter directive (tracing EnvFilter syntax)
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logs: false }
    }
}

impl ObservabilityConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let log_level =
            std::env::var("MESHCRED_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let json_logs = std::env::var("MESHCRED_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self { log_level, json_logs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cert_manager_options_defaults() {
        let options = CertManagerOptions::default();
        assert_eq!(options.directory, PathBuf::from("/certs"));
        assert_eq!(options.tries, DEFAULT_TRIES);
        assert_eq!(options.root_filename, "root-ca.pem");
        assert_eq!(options.cert_filename, "client.crt");
        assert_eq!(options.key_filename, "client.key");
        options.validate().unwrap();
    }

    #[test]
    fn test_cert_manager_options_rejects_duplicate_filenames() {
        let options = CertManagerOptions {
            key_filename: "client.crt".to_string(),
            ..Default::default()
        };
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }

    #[test]
    fn test_cert_manager_options_rejects_empty_directory() {
        let options = CertManagerOptions { directory: PathBuf::new(), ..Default::default() };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_ca_config_defaults_are_valid() {
        CaConfig::default().validate().unwrap();
    }

    #[test]
    fn test_ca_config_rejects_bad_address() {
        let config = CaConfig { address: "not a url".to_string(), ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not a valid URL"));
    }

    #[test]
    fn test_observability_config_from_env() {
        std::env::set_var("MESHCRED_LOG_LEVEL", "debug");
        std::env::set_var("MESHCRED_LOG_FORMAT", "JSON");

        let config = ObservabilityConfig::from_env();
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);

        std::env::remove_var("MESHCRED_LOG_LEVEL");
        std::env::remove_var("MESHCRED_LOG_FORMAT");
    }
}
