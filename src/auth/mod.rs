//! Authentication backends: one login provider per supported method.
//!
//! A login exchanges method-specific credential material for a
//! short-lived bearer token. Providers issue their HTTP calls
//! unauthenticated: the token being requested cannot gate the request
//! that produces it.

mod approle;
mod aws;
mod azure;
mod cert;
mod cloudfoundry;
mod custom;
mod gcp;
mod github;
mod jwt;
mod kerberos;
mod kubernetes;
mod ldap;
mod oci;
mod okta;
mod radius;
mod token;
mod userpass;

pub use approle::AppRoleAuthInfo;
pub use aws::{AwsEc2AuthInfo, AwsIamAuthInfo};
pub use azure::AzureAuthInfo;
pub use cert::CertAuthInfo;
pub use cloudfoundry::{signature, CloudFoundryAuthInfo};
pub use custom::CustomAuthInfo;
pub use gcp::GoogleCloudAuthInfo;
pub use github::GitHubAuthInfo;
pub use jwt::JwtAuthInfo;
pub use kerberos::KerberosAuthInfo;
pub use kubernetes::KubernetesAuthInfo;
pub use ldap::LdapAuthInfo;
pub use oci::OciAuthInfo;
pub use okta::OktaAuthInfo;
pub use radius::RadiusAuthInfo;
pub use token::TokenAuthInfo;
pub use userpass::UserPassAuthInfo;

use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::{Login, Secret};
use async_trait::async_trait;
use reqwest::Method;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Discriminator for the supported auth backends. String form matches
/// the backend's default mount point; parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethodType {
    Token,
    UserPass,
    Ldap,
    Okta,
    Radius,
    GitHub,
    AppRole,
    AwsEc2,
    AwsIam,
    Azure,
    GoogleCloud,
    Kubernetes,
    Jwt,
    Cert,
    Kerberos,
    CloudFoundry,
    Oci,
    Custom,
}

impl AuthMethodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::UserPass => "userpass",
            Self::Ldap => "ldap",
            Self::Okta => "okta",
            Self::Radius => "radius",
            Self::GitHub => "github",
            Self::AppRole => "approle",
            Self::AwsEc2 => "aws-ec2",
            Self::AwsIam => "aws-iam",
            Self::Azure => "azure",
            Self::GoogleCloud => "gcp",
            Self::Kubernetes => "kubernetes",
            Self::Jwt => "jwt",
            Self::Cert => "cert",
            Self::Kerberos => "kerberos",
            Self::CloudFoundry => "cf",
            Self::Oci => "oci",
            Self::Custom => "custom",
        }
    }

    /// The path segment the backend is mounted under when the caller
    /// does not override it.
    pub fn default_mount_point(&self) -> &'static str {
        match self {
            // Both AWS flavors log in through the same backend mount.
            Self::AwsEc2 | Self::AwsIam => "aws",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for AuthMethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethodType {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "userpass" => Ok(Self::UserPass),
            "ldap" => Ok(Self::Ldap),
            "okta" => Ok(Self::Okta),
            "radius" => Ok(Self::Radius),
            "github" => Ok(Self::GitHub),
            "approle" => Ok(Self::AppRole),
            "aws-ec2" => Ok(Self::AwsEc2),
            "aws-iam" => Ok(Self::AwsIam),
            "azure" => Ok(Self::Azure),
            "gcp" | "googlecloud" => Ok(Self::GoogleCloud),
            "kubernetes" => Ok(Self::Kubernetes),
            "jwt" | "oidc" => Ok(Self::Jwt),
            "cert" => Ok(Self::Cert),
            "kerberos" => Ok(Self::Kerberos),
            "cf" | "cloudfoundry" => Ok(Self::CloudFoundry),
            "oci" => Ok(Self::Oci),
            "custom" => Ok(Self::Custom),
            other => Err(VaultError::UnsupportedAuthMethod(other.to_string())),
        }
    }
}

/// Credential material for one auth backend. Closed union: unknown
/// backends are rejected where strings are parsed, and extensibility
/// goes through [`CustomAuthInfo`] exclusively.
#[derive(Clone)]
pub enum AuthMethodInfo {
    Token(TokenAuthInfo),
    UserPass(UserPassAuthInfo),
    Ldap(LdapAuthInfo),
    Okta(OktaAuthInfo),
    Radius(RadiusAuthInfo),
    GitHub(GitHubAuthInfo),
    AppRole(AppRoleAuthInfo),
    AwsEc2(AwsEc2AuthInfo),
    AwsIam(AwsIamAuthInfo),
    Azure(AzureAuthInfo),
    GoogleCloud(GoogleCloudAuthInfo),
    Kubernetes(KubernetesAuthInfo),
    Jwt(JwtAuthInfo),
    Cert(CertAuthInfo),
    Kerberos(KerberosAuthInfo),
    CloudFoundry(CloudFoundryAuthInfo),
    Oci(OciAuthInfo),
    Custom(CustomAuthInfo),
}

impl AuthMethodInfo {
    pub fn auth_method_type(&self) -> AuthMethodType {
        match self {
            Self::Token(_) => AuthMethodType::Token,
            Self::UserPass(_) => AuthMethodType::UserPass,
            Self::Ldap(_) => AuthMethodType::Ldap,
            Self::Okta(_) => AuthMethodType::Okta,
            Self::Radius(_) => AuthMethodType::Radius,
            Self::GitHub(_) => AuthMethodType::GitHub,
            Self::AppRole(_) => AuthMethodType::AppRole,
            Self::AwsEc2(_) => AuthMethodType::AwsEc2,
            Self::AwsIam(_) => AuthMethodType::AwsIam,
            Self::Azure(_) => AuthMethodType::Azure,
            Self::GoogleCloud(_) => AuthMethodType::GoogleCloud,
            Self::Kubernetes(_) => AuthMethodType::Kubernetes,
            Self::Jwt(_) => AuthMethodType::Jwt,
            Self::Cert(_) => AuthMethodType::Cert,
            Self::Kerberos(_) => AuthMethodType::Kerberos,
            Self::CloudFoundry(_) => AuthMethodType::CloudFoundry,
            Self::Oci(_) => AuthMethodType::Oci,
            Self::Custom(_) => AuthMethodType::Custom,
        }
    }
}

/// A login strategy for one auth backend.
#[async_trait]
pub trait LoginProvider: Send + Sync {
    /// Execute the backend's protocol and produce a bearer token.
    ///
    /// Never returns a blank token: a 2xx response without a usable
    /// `client_token` fails with [`VaultError::MissingClientToken`].
    async fn login(&self, cancel: Option<&CancellationToken>) -> Result<Login, VaultError>;
}

/// Resolve the provider for the given auth method, wired to the shared
/// executor (or to a dedicated transport where the protocol demands one).
pub fn login_provider(
    info: AuthMethodInfo,
    executor: Arc<RequestExecutor>,
) -> Result<Box<dyn LoginProvider>, VaultError> {
    let method = info.auth_method_type();
    debug!(%method, "resolving login provider");
    Ok(match info {
        AuthMethodInfo::Token(info) => Box::new(token::TokenLogin::new(info)),
        AuthMethodInfo::UserPass(info) => Box::new(userpass::UserPassLogin::new(info, executor)),
        AuthMethodInfo::Ldap(info) => Box::new(ldap::LdapLogin::new(info, executor)),
        AuthMethodInfo::Okta(info) => Box::new(okta::OktaLogin::new(info, executor)),
        AuthMethodInfo::Radius(info) => Box::new(radius::RadiusLogin::new(info, executor)),
        AuthMethodInfo::GitHub(info) => Box::new(github::GitHubLogin::new(info, executor)),
        AuthMethodInfo::AppRole(info) => Box::new(approle::AppRoleLogin::new(info, executor)),
        AuthMethodInfo::AwsEc2(info) => Box::new(aws::AwsEc2Login::new(info, executor)),
        AuthMethodInfo::AwsIam(info) => Box::new(aws::AwsIamLogin::new(info, executor)),
        AuthMethodInfo::Azure(info) => Box::new(azure::AzureLogin::new(info, executor)),
        AuthMethodInfo::GoogleCloud(info) => Box::new(gcp::GoogleCloudLogin::new(info, executor)),
        AuthMethodInfo::Kubernetes(info) => {
            Box::new(kubernetes::KubernetesLogin::new(info, executor))
        }
        AuthMethodInfo::Jwt(info) => Box::new(jwt::JwtLogin::new(info, executor)),
        AuthMethodInfo::Cert(info) => Box::new(cert::CertLogin::new(info, executor)?),
        AuthMethodInfo::Kerberos(info) => Box::new(kerberos::KerberosLogin::new(info, executor)),
        AuthMethodInfo::CloudFoundry(info) => {
            Box::new(cloudfoundry::CloudFoundryLogin::new(info, executor))
        }
        AuthMethodInfo::Oci(info) => Box::new(oci::OciLogin::new(info, executor)),
        AuthMethodInfo::Custom(info) => Box::new(custom::CustomLogin::new(info)),
    })
}

/// POST to a login endpoint (unauthenticated) and extract the auth stanza.
pub(crate) async fn login_request(
    executor: &RequestExecutor,
    path: &str,
    body: Option<serde_json::Value>,
    options: RequestOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Login, VaultError> {
    let options = RequestOptions {
        unauthenticated: true,
        ..options
    };
    let secret: Secret<serde_json::Value> = executor
        .vault_request(Method::POST, path, body, options, cancel)
        .await?;
    login_from_secret(secret)
}

/// A 2xx login response without a usable client token is a protocol
/// error, never a "success with no token".
pub(crate) fn login_from_secret(secret: Secret<serde_json::Value>) -> Result<Login, VaultError> {
    match secret.auth {
        Some(auth) if !auth.client_token.trim().is_empty() => Ok(Login {
            client_token: auth.client_token.clone(),
            auth,
        }),
        _ => Err(VaultError::MissingClientToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthInfo;

    #[test]
    fn test_method_type_round_trip() {
        for method in [
            AuthMethodType::Token,
            AuthMethodType::UserPass,
            AuthMethodType::Ldap,
            AuthMethodType::Okta,
            AuthMethodType::Radius,
            AuthMethodType::GitHub,
            AuthMethodType::AppRole,
            AuthMethodType::AwsEc2,
            AuthMethodType::AwsIam,
            AuthMethodType::Azure,
            AuthMethodType::GoogleCloud,
            AuthMethodType::Kubernetes,
            AuthMethodType::Jwt,
            AuthMethodType::Cert,
            AuthMethodType::Kerberos,
            AuthMethodType::CloudFoundry,
            AuthMethodType::Oci,
            AuthMethodType::Custom,
        ] {
            assert_eq!(method.as_str().parse::<AuthMethodType>().unwrap(), method);
        }
    }

    #[test]
    fn test_method_type_parse_is_case_insensitive() {
        assert_eq!(
            "AppRole".parse::<AuthMethodType>().unwrap(),
            AuthMethodType::AppRole
        );
        assert_eq!(
            "OIDC".parse::<AuthMethodType>().unwrap(),
            AuthMethodType::Jwt
        );
    }

    #[test]
    fn test_unknown_method_type_is_unsupported() {
        let err = "appid".parse::<AuthMethodType>().unwrap_err();
        assert!(matches!(err, VaultError::UnsupportedAuthMethod(name) if name == "appid"));
    }

    #[test]
    fn test_aws_flavors_share_a_mount() {
        assert_eq!(AuthMethodType::AwsEc2.default_mount_point(), "aws");
        assert_eq!(AuthMethodType::AwsIam.default_mount_point(), "aws");
    }

    #[test]
    fn test_login_from_secret_accepts_token() {
        let secret = Secret {
            auth: Some(AuthInfo::for_raw_token("t1")),
            ..Secret::default()
        };
        let login = login_from_secret(secret).unwrap();
        assert_eq!(login.client_token, "t1");
    }

    #[test]
    fn test_login_from_secret_rejects_missing_auth() {
        let secret: Secret<serde_json::Value> = Secret::default();
        assert!(matches!(
            login_from_secret(secret),
            Err(VaultError::MissingClientToken)
        ));
    }

    #[test]
    fn test_login_from_secret_rejects_blank_token() {
        let secret = Secret {
            auth: Some(AuthInfo::for_raw_token("   ")),
            ..Secret::default()
        };
        assert!(matches!(
            login_from_secret(secret),
            Err(VaultError::MissingClientToken)
        ));
    }
}
