use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Azure managed-identity material: the MSI-issued JWT plus the
/// instance coordinates the server checks it against. The whole struct
/// is the login request body.
#[derive(Clone, Serialize)]
pub struct AzureAuthInfo {
    #[serde(skip)]
    mount_point: String,
    role: String,
    jwt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vm_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vmss_name: Option<String>,
}

impl AzureAuthInfo {
    pub fn new(role: impl Into<String>, jwt: impl Into<String>) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::Azure.default_mount_point().to_string(),
            role: checker::not_blank("role", role)?,
            jwt: checker::not_blank("jwt", jwt)?,
            subscription_id: None,
            resource_group_name: None,
            vm_name: None,
            vmss_name: None,
        })
    }

    pub fn with_subscription_id(mut self, value: impl Into<String>) -> Result<Self, VaultError> {
        self.subscription_id = Some(checker::not_blank("subscription_id", value)?);
        Ok(self)
    }

    pub fn with_resource_group_name(
        mut self,
        value: impl Into<String>,
    ) -> Result<Self, VaultError> {
        self.resource_group_name = Some(checker::not_blank("resource_group_name", value)?);
        Ok(self)
    }

    pub fn with_vm_name(mut self, value: impl Into<String>) -> Result<Self, VaultError> {
        self.vm_name = Some(checker::not_blank("vm_name", value)?);
        Ok(self)
    }

    pub fn with_vmss_name(mut self, value: impl Into<String>) -> Result<Self, VaultError> {
        self.vmss_name = Some(checker::not_blank("vmss_name", value)?);
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

pub(super) struct AzureLogin {
    info: AzureAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl AzureLogin {
    pub(super) fn new(info: AzureAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for AzureLogin {
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
