//! HTTP implementation of the certificate-authority client.
//!
//! Talks to the control plane's agent API:
//!
//! - `GET /v1/agent/ca/roots` for the root CA listing
//! - `GET /v1/agent/ca/leaf/{service}` for a service's leaf certificate
//!
//! Requests optionally carry a bearer token. Any non-2xx response is
//! surfaced as a retryable [`CaError`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::CaConfig;
use crate::secrets::SecretString;

use super::client::CaClient;
use super::error::{CaError, Result};
use super::types::{CaRoot, CaRootList, LeafCertificate};

const ROOTS_PATH: &str = "v1/agent/ca/roots";
const LEAF_PATH_PREFIX: &str = "v1/agent/ca/leaf";

/// Certificate-authority client over the control-plane HTTP API.
pub struct HttpCaClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for HttpCaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCaClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token)
            .finish()
    }
}

impl HttpCaClient {
    /// Build a client from configuration.
    pub fn new(config: &CaConfig) -> Result<Self> {
        // Normalize to a trailing slash so Url::join appends instead of
        // replacing the last path segment.
        let normalized = format!("{}/", config.address.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|source| CaError::invalid_address(&config.address, source))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { http, base_url, token: config.token.clone() })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .map_err(|source| CaError::invalid_address(self.base_url.as_str(), source))?;

        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CaError::unexpected_status(status.as_u16(), path));
        }

        response
            .json::<T>()
            .await
            .map_err(|source| CaError::Decode { path: path.to_string(), source })
    }
}

#[async_trait]
impl CaClient for HttpCaClient {
    async fn fetch_active_root(&self) -> Result<CaRoot> {
        let roots: CaRootList = self.get_json(ROOTS_PATH).await?;
        let root = roots.into_active().ok_or(CaError::NoActiveRoot)?;
        debug!(ca = %self.base_url, "Fetched active root CA certificate");
        Ok(root)
    }

    async fn fetch_leaf(&self, service: &str) -> Result<LeafCertificate> {
        let path = format!("{}/{}", LEAF_PATH_PREFIX, service);
        let leaf: LeafCertificate = self.get_json(&path).await?;
        debug!(service = %service, valid_before = %leaf.valid_before, "Fetched leaf certificate");
        Ok(leaf)
    }
}
