use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// AppRole credentials. The secret ID is optional (bind_secret_id=false
/// roles); when absent it is omitted from the body entirely, never sent
/// as an empty string.
#[derive(Clone)]
pub struct AppRoleAuthInfo {
    mount_point: String,
    role_id: String,
    secret_id: Option<String>,
}

impl AppRoleAuthInfo {
    pub fn new(role_id: impl Into<String>) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::AppRole.default_mount_point().to_string(),
            role_id: checker::not_blank("role_id", role_id)?,
            secret_id: None,
        })
    }

    pub fn with_secret_id(mut self, secret_id: impl Into<String>) -> Result<Self, VaultError> {
        self.secret_id = Some(checker::not_blank("secret_id", secret_id)?);
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

#[derive(Serialize)]
struct AppRoleLoginRequest<'a> {
    role_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_id: Option<&'a str>,
}

pub(super) struct AppRoleLogin {
    info: AppRoleAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl AppRoleLogin {
    pub(super) fn new(info: AppRoleAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for AppRoleLogin {
    async fn login(&self, cancel: Option<&CancellationToken>) -> Result<Login, VaultError> {
        let path = format!("auth/{}/login", self.info.mount_point);
        let body = serde_json::to_value(AppRoleLoginRequest {
            role_id: &self.info.role_id,
            secret_id: self.info.secret_id.as_deref(),
        })?;
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
