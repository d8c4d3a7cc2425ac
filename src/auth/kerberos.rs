use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Kerberos credential: a caller-obtained SPNEGO token. The credential
/// rides in the `Authorization: Negotiate ...` header, not in a JSON
/// body; negotiation itself is platform material this crate cannot
/// produce portably.
#[derive(Clone)]
pub struct KerberosAuthInfo {
    mount_point: String,
    spnego_token: String,
}

impl KerberosAuthInfo {
    pub fn new(spnego_token: impl Into<String>) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::Kerberos.default_mount_point().to_string(),
            spnego_token: checker::not_blank("spnego_token", spnego_token)?,
        })
    }

    pub fn with_mount_point(mut self, mount_point: impl Into<String>) -> Result<Self, VaultError> {
        self.mount_point = checker::mount_point(mount_point)?;
        Ok(self)
    }

    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    fn authorization_header(&self) -> String {
        format!("Negotiate {}", self.spnego_token)
    }
}

pub(super) struct KerberosLogin {
    info: KerberosAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl KerberosLogin {
    pub(super) fn new(info: KerberosAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for KerberosLogin {
    async fn login(&self, cancel: Option<&CancellationToken>) -> Result<Login, VaultError> {
        let path = format!("auth/{}/login", self.info.mount_point);
        let options =
            RequestOptions::default().with_header("Authorization", self.info.authorization_header());
        login_request(&self.executor, &path, None, options, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_header_format() {
        let info = KerberosAuthInfo::new("YIIC...base64").unwrap();
        assert_eq!(info.authorization_header(), "Negotiate YIIC...base64");
    }

    #[test]
    fn test_blank_spnego_token_rejected() {
        assert!(KerberosAuthInfo::new("").is_err());
    }
}
