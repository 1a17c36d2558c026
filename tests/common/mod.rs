//! In-process fake certificate authority for integration tests.
//!
//! Serves the control-plane agent API over a random localhost port. Each
//! fetch kind carries a budget of forced failures, and the first
//! `expirations` leaf responses report a validity window that ends
//! immediately, which forces the manager into extra renewal cycles.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use uuid::Uuid;

/// Handle to a running fake CA.
pub struct FakeCa {
    pub address: String,
    pub root_cert_pem: String,
    pub client_cert_pem: String,
    pub private_key_pem: String,
}

struct CaState {
    service: String,
    leaf_failures: AtomicU64,
    root_failures: AtomicU64,
    expirations: AtomicU32,
    root_cert_pem: String,
    client_cert_pem: String,
    private_key_pem: String,
}

/// Spend one unit of a failure budget; returns true while budget remains.
fn take(counter: &AtomicU64) -> bool {
    counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1)).is_ok()
}

async fn roots(State(state): State<Arc<CaState>>) -> Response {
    if take(&state.root_failures) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    Json(json!({
        "Roots": [{ "RootCert": state.root_cert_pem, "Active": true }]
    }))
    .into_response()
}

async fn leaf(State(state): State<Arc<CaState>>, Path(service): Path<String>) -> Response {
    if service != state.service {
        return StatusCode::NOT_FOUND.into_response();
    }

    let expired = state
        .expirations
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1))
        .is_ok();
    let valid_before = if expired { Utc::now() } else { Utc::now() + ChronoDuration::minutes(10) };

    if take(&state.leaf_failures) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    Json(json!({
        "CertPEM": state.client_cert_pem,
        "PrivateKeyPEM": state.private_key_pem,
        "ValidBefore": valid_before.to_rfc3339(),
    }))
    .into_response()
}

/// Start a fake CA for `service` on a random port.
pub async fn spawn_fake_ca(
    service: &str,
    leaf_failures: u64,
    root_failures: u64,
    expirations: u32,
) -> FakeCa {
    let state = Arc::new(CaState {
        service: service.to_string(),
        leaf_failures: AtomicU64::new(leaf_failures),
        root_failures: AtomicU64::new(root_failures),
        expirations: AtomicU32::new(expirations),
        root_cert_pem: format!("root-{}", Uuid::new_v4()),
        client_cert_pem: format!("cert-{}", Uuid::new_v4()),
        private_key_pem: format!("key-{}", Uuid::new_v4()),
    });

    let app = Router::new()
        .route("/v1/agent/ca/roots", get(roots))
        .route("/v1/agent/ca/leaf/{service}", get(leaf))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeCa {
        address: format!("http://{}", addr),
        root_cert_pem: state.root_cert_pem.clone(),
        client_cert_pem: state.client_cert_pem.clone(),
        private_key_pem: state.private_key_pem.clone(),
    }
}
