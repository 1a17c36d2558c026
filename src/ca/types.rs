//! Wire types for the certificate-authority API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::secrets::SecretString;

/// One root CA certificate known to the control plane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaRoot {
    /// PEM-encoded root CA certificate
    #[serde(rename = "RootCert")]
    pub root_cert_pem: String,

    /// Whether this root currently anchors trust for the mesh
    #[serde(rename = "Active")]
    pub active: bool,
}

/// The control plane's root CA listing.
///
/// Exactly one root is expected to be active at a time; the manager only
/// ever consumes the active one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaRootList {
    #[serde(rename = "Roots")]
    pub roots: Vec<CaRoot>,
}

impl CaRootList {
    /// Select the active root, if any.
    pub fn into_active(self) -> Option<CaRoot> {
        self.roots.into_iter().find(|root| root.active)
    }
}

/// A leaf certificate issued for a specific service identity.
#[derive(Debug, Clone, Deserialize)]
pub struct LeafCertificate {
    /// PEM-encoded client certificate
    #[serde(rename = "CertPEM")]
    pub cert_pem: String,

    /// PEM-encoded private key (redacted in logs and serialization)
    #[serde(rename = "PrivateKeyPEM")]
    pub private_key_pem: SecretString,

    /// End of the certificate's validity window; drives renewal scheduling
    #[serde(rename = "ValidBefore")]
    pub valid_before: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_root_list_selects_active() {
        let list = CaRootList {
            roots: vec![
                CaRoot { root_cert_pem: "old".into(), active: false },
                CaRoot { root_cert_pem: "current".into(), active: true },
                CaRoot { root_cert_pem: "staged".into(), active: false },
            ],
        };
        assert_eq!(list.into_active().unwrap().root_cert_pem, "current");
    }

    #[test]
    fn test_root_list_without_active_root() {
        let list = CaRootList {
            roots: vec![CaRoot { root_cert_pem: "retired".into(), active: false }],
        };
        assert!(list.into_active().is_none());

        let empty = CaRootList { roots: vec![] };
        assert!(empty.into_active().is_none());
    }

    #[test]
    fn test_root_list_wire_format() {
        let list: CaRootList =
            serde_json::from_str(r#"{"Roots":[{"RootCert":"pem-data","Active":true}]}"#).unwrap();
        assert_eq!(list.roots.len(), 1);
        assert!(list.roots[0].active);
        assert_eq!(list.roots[0].root_cert_pem, "pem-data");
    }

    #[test]
    fn test_leaf_wire_format() {
        let leaf: LeafCertificate = serde_json::from_str(
            r#"{"CertPEM":"cert","PrivateKeyPEM":"key","ValidBefore":"2026-08-07T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(leaf.cert_pem, "cert");
        assert_eq!(leaf.private_key_pem.expose_secret(), "key");
        assert_eq!(leaf.valid_before, Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_leaf_debug_redacts_private_key() {
        let leaf: LeafCertificate = serde_json::from_str(
            r#"{"CertPEM":"cert","PrivateKeyPEM":"sensitive","ValidBefore":"2026-08-07T12:00:00Z"}"#,
        )
        .unwrap();
        let debug = format!("{:?}", leaf);
        assert!(!debug.contains("sensitive"));
        assert!(debug.contains("[REDACTED]"));
    }
}
