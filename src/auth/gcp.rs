use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Google Cloud identity: a signed JWT (IAM service account or GCE
/// instance identity) bound to a role.
#[derive(Clone, Serialize)]
pub struct GoogleCloudAuthInfo {
    #[serde(skip)]
    mount_point: String,
    role: String,
    jwt: String,
}

impl GoogleCloudAuthInfo {
    pub fn new(role: impl Into<String>, jwt: impl Into<String>) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::GoogleCloud
                .default_mount_point()
                .to_string(),
            role: checker::not_blank("role", role)?,
            jwt: checker::not_blank("jwt", jwt)?,
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

pub(super) struct GoogleCloudLogin {
    info: GoogleCloudAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl GoogleCloudLogin {
    pub(super) fn new(info: GoogleCloudAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for GoogleCloudLogin {
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
