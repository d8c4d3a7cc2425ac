use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A GitHub personal access token.
#[derive(Clone)]
pub struct GitHubAuthInfo {
    mount_point: String,
    personal_access_token: String,
}

impl GitHubAuthInfo {
    pub fn new(personal_access_token: impl Into<String>) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::GitHub.default_mount_point().to_string(),
            personal_access_token: checker::not_blank(
                "personal_access_token",
                personal_access_token,
            )?,
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

pub(super) struct GitHubLogin {
    info: GitHubAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl GitHubLogin {
    pub(super) fn new(info: GitHubAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for GitHubLogin {
    async fn login(&self, cancel: Option<&CancellationToken>) -> Result<Login, VaultError> {
        let path = format!("auth/{}/login", self.info.mount_point);
        let body = serde_json::json!({ "token": self.info.personal_access_token });
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
