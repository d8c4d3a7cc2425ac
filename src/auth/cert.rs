use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// TLS client-certificate identity. The certificate is presented during
/// the TLS handshake, not in the request body; the body is empty unless
/// a certificate role is named.
#[derive(Clone)]
pub struct CertAuthInfo {
    mount_point: String,
    /// PEM bundle holding the client certificate and its private key.
    identity_pem: Vec<u8>,
    role_name: Option<String>,
}

impl CertAuthInfo {
    pub fn new(identity_pem: impl Into<Vec<u8>>) -> Result<Self, VaultError> {
        let identity_pem = identity_pem.into();
        if identity_pem.is_empty() {
            return Err(VaultError::invalid_argument(
                "identity_pem",
                "must not be empty",
            ));
        }
        Ok(Self {
            mount_point: AuthMethodType::Cert.default_mount_point().to_string(),
            identity_pem,
            role_name: None,
        })
    }

    pub fn with_role_name(mut self, role_name: impl Into<String>) -> Result<Self, VaultError> {
        self.role_name = Some(checker::not_blank("role_name", role_name)?);
        Ok(self)
    }

    pub fn with_mount_point(mut self, mount_point: impl Into<String>) -> Result<Self, VaultError> {
        self.mount_point = checker::mount_point(mount_point)?;
        Ok(self)
    }

    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }
}

pub(super) struct CertLogin {
    info: CertAuthInfo,
    /// Dedicated executor whose transport presents the client certificate.
    executor: RequestExecutor,
}

impl CertLogin {
    pub(super) fn new(
        info: CertAuthInfo,
        shared: Arc<RequestExecutor>,
    ) -> Result<Self, VaultError> {
        let identity = reqwest::Identity::from_pem(&info.identity_pem)
            .map_err(|e| VaultError::invalid_argument("identity_pem", e.to_string()))?;
        let http = reqwest::Client::builder()
            .identity(identity)
            .use_rustls_tls()
            .build()
            .map_err(|e| VaultError::Transport(e.to_string()))?;
        Ok(Self {
            executor: shared.duplicate_with_client(http),
            info,
        })
    }
}

#[async_trait]
impl LoginProvider for CertLogin {
    async fn login(&self, cancel: Option<&CancellationToken>) -> Result<Login, VaultError> {
        let path = format!("auth/{}/login", self.info.mount_point);
        // No body at all unless a certificate role is named.
        let body = self
            .info
            .role_name
            .as_deref()
            .map(|name| serde_json::json!({ "name": name }));
        login_request(
            &self.executor,
            &path,
            body,
            RequestOptions::default(),
            cancel,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pem_rejected() {
        assert!(CertAuthInfo::new(Vec::new()).is_err());
    }

    #[test]
    fn test_role_name_body_shape() {
        let info = CertAuthInfo::new(b"-----BEGIN CERTIFICATE-----".to_vec())
            .unwrap()
            .with_role_name("web")
            .unwrap();
        let body = info
            .role_name
            .as_deref()
            .map(|name| serde_json::json!({ "name": name }));
        assert_eq!(body, Some(serde_json::json!({ "name": "web" })));
    }

    #[test]
    fn test_no_role_means_no_body() {
        let info = CertAuthInfo::new(b"-----BEGIN CERTIFICATE-----".to_vec()).unwrap();
        assert!(info.role_name.is_none());
    }
}
