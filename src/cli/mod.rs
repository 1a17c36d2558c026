//! # Command Line Interface
//!
//! Commands for running the credential manager as part of a gateway
//! deployment and for probing connectivity to the certificate authority.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::ca::{CaClient, HttpCaClient};
use crate::config::{CaConfig, CertManagerOptions};
use crate::errors::Result;
use crate::manager::{CertManager, RetryConfig};
use crate::secrets::SecretString;

#[derive(Parser)]
#[command(name = "meshcred")]
#[command(about = "Gateway credential lifecycle manager")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and renew the gateway identity until interrupted
    Run(ManagerArgs),

    /// Probe the certificate authority once and report the leaf expiry
    Check(ManagerArgs),
}

#[derive(Args)]
pub struct ManagerArgs {
    /// Base address of the control plane's certificate-authority API
    #[arg(long, env = "MESHCRED_CA_ADDRESS", default_value = "http://127.0.0.1:8080")]
    pub ca_address: String,

    /// Bearer token presented to the certificate authority
    #[arg(long, env = "MESHCRED_CA_TOKEN")]
    pub ca_token: Option<String>,

    /// Service identity to request leaf certificates for
    #[arg(long, env = "MESHCRED_SERVICE")]
    pub service: String,

    /// Directory that receives the persisted credential files
    #[arg(long, env = "MESHCRED_CERT_DIR", default_value = "/certs")]
    pub directory: PathBuf,

    /// Consecutive failures tolerated per fetch kind before giving up
    /// (0 fails the run on the first error)
    #[arg(long, env = "MESHCRED_TRIES", default_value_t = crate::config::settings::DEFAULT_TRIES)]
    pub tries: u32,

    /// Backoff before the first retry of a failed fetch, in milliseconds
    #[arg(long, env = "MESHCRED_RETRY_BACKOFF_MS", default_value_t = 1000)]
    pub retry_backoff_ms: u64,
}

impl ManagerArgs {
    fn ca_config(&self) -> CaConfig {
        CaConfig {
            address: self.ca_address.clone(),
            token: self.ca_token.as_deref().map(SecretString::from),
            ..CaConfig::default()
        }
    }

    fn manager_options(&self) -> CertManagerOptions {
        CertManagerOptions {
            directory: self.directory.clone(),
            tries: self.tries,
            ..CertManagerOptions::default()
        }
    }

    fn client(&self) -> Result<Arc<dyn CaClient>> {
        let ca_config = self.ca_config();
        ca_config.validate()?;
        Ok(Arc::new(HttpCaClient::new(&ca_config)?))
    }
}

/// Run the credential manager under a shutdown token tied to process signals.
pub async fn run(args: ManagerArgs) -> Result<()> {
    let options = args.manager_options();
    options.validate()?;
    let client = args.client()?;

    let retry_config = RetryConfig {
        initial_backoff: Duration::from_millis(args.retry_backoff_ms),
        ..RetryConfig::default()
    };
    let manager =
        CertManager::new(Some(client), &args.service, options).with_retry_config(retry_config);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, stopping certificate manager");
        signal_token.cancel();
    });

    manager.manage(shutdown).await
}

/// One-shot connectivity probe against the certificate authority.
pub async fn check(args: ManagerArgs) -> Result<()> {
    let client = args.client()?;

    let root = client.fetch_active_root().await?;
    println!("active root CA: {} bytes of PEM", root.root_cert_pem.len());

    let leaf = client.fetch_leaf(&args.service).await?;
    println!("leaf certificate for '{}': valid before {}", args.service, leaf.valid_before);

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("Failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler");
        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_map_into_config() {
        let args = ManagerArgs {
            ca_address: "http://10.0.0.1:8080".to_string(),
            ca_token: Some("token".to_string()),
            service: "svc-a".to_string(),
            directory: PathBuf::from("/tmp/certs"),
            tries: 3,
            retry_backoff_ms: 1000,
        };

        let ca_config = args.ca_config();
        assert_eq!(ca_config.address, "http://10.0.0.1:8080");
        assert_eq!(ca_config.token.unwrap().expose_secret(), "token");

        let options = args.manager_options();
        assert_eq!(options.directory, PathBuf::from("/tmp/certs"));
        assert_eq!(options.tries, 3);
        assert_eq!(options.root_filename, "root-ca.pem");
    }

    #[test]
    fn test_cli_parses_run_command() {
        let cli = Cli::try_parse_from([
            "meshcred",
            "run",
            "--service",
            "svc-a",
            "--ca-address",
            "http://127.0.0.1:9090",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.service, "svc-a");
                assert_eq!(args.ca_address, "http://127.0.0.1:9090");
                assert_eq!(args.directory, PathBuf::from("/certs"));
            }
            _ => panic!("expected run command"),
        }
    }
}
