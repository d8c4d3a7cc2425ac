use super::{login_request, AuthMethodType, LoginProvider};
use crate::checker;
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::Login;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// EC2 instance-identity material. Requires either the PKCS#7 document
/// or the identity document plus its signature; the whole struct is the
/// login request body.
#[derive(Clone, Serialize)]
pub struct AwsEc2AuthInfo {
    #[serde(skip)]
    mount_point: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pkcs7: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nonce: Option<String>,
}

impl AwsEc2AuthInfo {
    pub fn with_pkcs7(pkcs7: impl Into<String>) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::AwsEc2.default_mount_point().to_string(),
            role: None,
            pkcs7: Some(checker::not_blank("pkcs7", pkcs7)?),
            identity: None,
            signature: None,
            nonce: None,
        })
    }

    pub fn with_identity_document(
        identity: impl Into<String>,
        signature: impl Into<String>,
    ) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::AwsEc2.default_mount_point().to_string(),
            role: None,
            pkcs7: None,
            identity: Some(checker::not_blank("identity", identity)?),
            signature: Some(checker::not_blank("signature", signature)?),
            nonce: None,
        })
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Result<Self, VaultError> {
        self.role = Some(checker::not_blank("role", role)?);
        Ok(self)
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Result<Self, VaultError> {
        self.nonce = Some(checker::not_blank("nonce", nonce)?);
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

/// A pre-signed `sts:GetCallerIdentity` request: method, URL, body, and
/// headers, all base64-encoded by the caller's AWS signer. The whole
/// struct is the login request body.
#[derive(Clone, Serialize)]
pub struct AwsIamAuthInfo {
    #[serde(skip)]
    mount_point: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    iam_http_request_method: String,
    iam_request_url: String,
    iam_request_body: String,
    iam_request_headers: String,
}

impl AwsIamAuthInfo {
    pub fn new(
        iam_http_request_method: impl Into<String>,
        iam_request_url: impl Into<String>,
        iam_request_body: impl Into<String>,
        iam_request_headers: impl Into<String>,
    ) -> Result<Self, VaultError> {
        Ok(Self {
            mount_point: AuthMethodType::AwsIam.default_mount_point().to_string(),
            role: None,
            iam_http_request_method: checker::not_blank(
                "iam_http_request_method",
                iam_http_request_method,
            )?,
            iam_request_url: checker::not_blank("iam_request_url", iam_request_url)?,
            iam_request_body: checker::not_blank("iam_request_body", iam_request_body)?,
            iam_request_headers: checker::not_blank("iam_request_headers", iam_request_headers)?,
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

pub(super) struct AwsEc2Login {
    info: AwsEc2AuthInfo,
    executor: Arc<RequestExecutor>,
}

impl AwsEc2Login {
    pub(super) fn new(info: AwsEc2AuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for AwsEc2Login {
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

pub(super) struct AwsIamLogin {
    info: AwsIamAuthInfo,
    executor: Arc<RequestExecutor>,
}

impl AwsIamLogin {
    pub(super) fn new(info: AwsIamAuthInfo, executor: Arc<RequestExecutor>) -> Self {
        Self { info, executor }
    }
}

#[async_trait]
impl LoginProvider for AwsIamLogin {
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
    fn test_ec2_body_is_self_describing() {
        let info = AwsEc2AuthInfo::with_pkcs7("doc")
            .unwrap()
            .with_role("web")
            .unwrap();
        let body = serde_json::to_value(&info).unwrap();
        assert_eq!(body, serde_json::json!({ "role": "web", "pkcs7": "doc" }));
    }

    #[test]
    fn test_ec2_identity_document_variant() {
        let info = AwsEc2AuthInfo::with_identity_document("doc", "sig").unwrap();
        let body = serde_json::to_value(&info).unwrap();
        assert_eq!(body["identity"], "doc");
        assert_eq!(body["signature"], "sig");
        assert!(body.get("pkcs7").is_none());
        assert!(body.get("role").is_none());
    }

    #[test]
    fn test_iam_body_fields() {
        let info = AwsIamAuthInfo::new("POST", "dXJs", "Ym9keQ==", "aGVhZGVycw==")
            .unwrap()
            .with_role("db")
            .unwrap();
        let body = serde_json::to_value(&info).unwrap();
        assert_eq!(body["iam_http_request_method"], "POST");
        assert_eq!(body["role"], "db");
        assert!(body.get("mount_point").is_none());
    }

    #[test]
    fn test_both_flavors_mount_under_aws() {
        assert_eq!(AwsEc2AuthInfo::with_pkcs7("d").unwrap().mount_point(), "aws");
        assert_eq!(
            AwsIamAuthInfo::new("POST", "u", "b", "h").unwrap().mount_point(),
            "aws"
        );
    }
}
