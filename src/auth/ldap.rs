use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// LDAP bind credentials.
#[derive(Clone)]
pub struct LdapAuthInfo {
    mount_point: String,
    username: String,
    password: String,
}

impl LdapAuthInfo {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::Ldap.default_mount_point().to_string(),
            username: checker::not_blank("username", username)?,
            password: checker::not_blank("password", password)?,
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

pub(super) struct LdapLogin {
    info: LdapAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl LdapLogin {
    pub(super) fn new(info: LdapAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for LdapLogin {
    async fn login(&self, cancel: Option<&CancellationToken>) -> Result<Login, VaultError> {
        let path = format!(
            "auth/{}/login/{}",
            self.info.mount_point, self.info.username
        );
        let body = serde_json::json!({ "password": self.info.password });
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
