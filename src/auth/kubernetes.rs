use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_SERVICE_ACCOUNT_JWT_PATH: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Kubernetes service-account identity: role plus the projected
/// service-account JWT.
#[derive(Clone, Serialize)]
pub struct KubernetesAuthInfo {
    #[serde(skip)]
    mount_point: String,
    role: String,
    jwt: String,
}

impl KubernetesAuthInfo {
    pub fn new(role: impl Into<String>, jwt: impl Into<String>) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::Kubernetes.default_mount_point().to_string(),
            role: checker::not_blank("role", role)?,
            jwt: checker::not_blank("jwt", jwt)?,
        })
    }

    /// Read the service-account JWT from its mounted file. Fails here,
    /// not at login time, if the file is missing or empty.
    pub fn from_service_account_file(
        role: impl Into<String>,
        jwt_path: impl AsRef<Path>,
    ) -> Result<Self, VaultError> {
        let jwt = std::fs::read_to_string(jwt_path.as_ref())?;
        Self::new(role, jwt.trim())
    }

    pub fn with_mount_point(mut self, mount_point: impl Into<String>) -> Result<Self, VaultError> {
        self.mount_point = checker::mount_point(mount_point)?;
        Ok(self)
    }

    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }
}

pub(super) struct KubernetesLogin {
    info: KubernetesAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl KubernetesLogin {
    pub(super) fn new(info: KubernetesAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for KubernetesLogin {
    async fn login(&self, cancel: Option<&CancellationToken>) -> Result<Login, VaultError> {
        let path = format!("auth/{}/login", self.info.mount_point);
        let body = serde_json::to_value(&self.info)?;
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
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_kubernetes_body() {
        let info = KubernetesAuthInfo::new("app", "sa-jwt").unwrap();
        let body = serde_json::to_value(&info).unwrap();
        assert_eq!(body, serde_json::json!({ "role": "app", "jwt": "sa-jwt" }));
    }

    #[test]
    fn test_from_service_account_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "my-sa-jwt").unwrap();

        let info = KubernetesAuthInfo::from_service_account_file("app", file.path()).unwrap();
        let body = serde_json::to_value(&info).unwrap();
        assert_eq!(body["jwt"], "my-sa-jwt");
    }

    #[test]
    fn test_missing_jwt_file_fails_at_construction() {
        let result = KubernetesAuthInfo::from_service_account_file("app", "/nonexistent/path");
        assert!(matches!(result, Err(VaultError::Io(_))));
    }

    #[test]
    fn test_empty_jwt_file_fails_at_construction() {
        let file = NamedTempFile::new().unwrap();
        let result = KubernetesAuthInfo::from_service_account_file("app", file.path());
        assert!(result.is_err());
    }
}
