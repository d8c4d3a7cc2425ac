use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Okta credentials, optionally with a one-time TOTP passcode.
#[derive(Clone)]
pub struct OktaAuthInfo {
    mount_point: String,
    username: String,
    password: String,
    totp: Option<String>,
}

impl OktaAuthInfo {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::Okta.default_mount_point().to_string(),
            username: checker::not_blank("username", username)?,
            password: checker::not_blank("password", password)?,
            totp: None,
        })
    }

    pub fn with_totp(mut self, totp: impl Into<String>) -> Result<Self, VaultError> {
        self.totp = Some(checker::not_blank("totp", totp)?);
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
struct OktaLoginRequest<'a> {
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    totp: Option<&'a str>,
}

pub(super) struct OktaLogin {
    info: OktaAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl OktaLogin {
    pub(super) fn new(info: OktaAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for OktaLogin {
    async fn login(&self, cancel: Option<&CancellationToken>) -> Result<Login, VaultError> {
        let path = format!(
            "auth/{}/login/{}",
            self.info.mount_point, self.info.username
        );
        let body = serde_json::to_value(OktaLoginRequest {
            password: &self.info.password,
            totp: self.info.totp.as_deref(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totp_absent_from_body_when_not_set() {
        let body = serde_json::to_value(OktaLoginRequest {
            password: "pw",
            totp: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "password": "pw" }));
    }

    #[test]
    fn test_totp_present_when_set() {
        let body = serde_json::to_value(OktaLoginRequest {
            password: "pw",
            totp: Some("123456"),
        })
        .unwrap();
        assert_eq!(body["totp"], "123456");
    }
}
