use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// OCI identity: the signed headers of an OCI API request, produced by
/// the caller's OCI request signer, relayed for server-side validation.
#[derive(Clone)]
pub struct OciAuthInfo {
    mount_point: String,
    role: String,
    request_headers: HashMap<String, Vec<String>>,
}

impl OciAuthInfo {
    pub fn new(
        role: impl Into<String>,
        request_headers: HashMap<String, Vec<String>>,
    ) -> Result<Self, VaultError> {
        if request_headers.is_empty() {
            return Err(VaultError::invalid_argument(
                "request_headers",
                "must not be empty",
            ));
        }
        Ok(Self {
            mount_point: AuthMethodType::Oci.default_mount_point().to_string(),
            role: checker::not_blank("role", role)?,
            request_headers,
        })
    }

    pub fn with_mount_point(mut self, mount_point: impl Into<String>) -> Result<Self, VaultError> {
        self.mount_point = checker::mount_point(mount_point)?;
        Ok(self)
    }

    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }
}

pub(super) struct OciLogin {
    info: OciAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl OciLogin {
    pub(super) fn new(info: OciAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for OciLogin {
    async fn login(&self, cancel: Option<&CancellationToken>) -> Result<Login, VaultError> {
        // The role rides in the path, the signed headers in the body.
        let path = format!("auth/{}/login/{}", self.info.mount_point, self.info.role);
        let body = serde_json::json!({ "request_headers": self.info.request_headers });
        login_request(
            &self.executor,
            &path,
            Some(body),
            RequestOptions::default(),
            cancel,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> HashMap<String, Vec<String>> {
        HashMap::from([(
            "authorization".to_string(),
            vec!["Signature version=\"1\"".to_string()],
        )])
    }

    #[test]
    fn test_oci_defaults() {
        let info = OciAuthInfo::new("web", headers()).unwrap();
        assert_eq!(info.mount_point(), "oci");
    }

    #[test]
    fn test_empty_headers_rejected() {
        assert!(OciAuthInfo::new("web", HashMap::new()).is_err());
    }
}
