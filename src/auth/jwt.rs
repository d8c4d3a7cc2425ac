use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A caller-obtained OIDC/JWT bearer credential. The role is optional:
/// the backend falls back to its configured default role.
#[derive(Clone, Serialize)]
pub struct JwtAuthInfo {
    #[serde(skip)]
    mount_point: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    jwt: String,
}

impl JwtAuthInfo {
    pub fn new(jwt: impl Into<String>) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::Jwt.default_mount_point().to_string(),
            role: None,
            jwt: checker::not_blank("jwt", jwt)?,
        })
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Result<Self, VaultError> {
        self.role = Some(checker::not_blank("role", role)?);
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

pub(super) struct JwtLogin {
    info: JwtAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl JwtLogin {
    pub(super) fn new(info: JwtAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for JwtLogin {
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

    #[test]
    fn test_role_omitted_when_absent() {
        let info = JwtAuthInfo::new("eyJ").unwrap();
        let body = serde_json::to_value(&info).unwrap();
        assert_eq!(body, serde_json::json!({ "jwt": "eyJ" }));
    }

    #[test]
    fn test_role_present_when_set() {
        let info = JwtAuthInfo::new("eyJ").unwrap().with_role("dev").unwrap();
        let body = serde_json::to_value(&info).unwrap();
        assert_eq!(body["role"], "dev");
    }
}
