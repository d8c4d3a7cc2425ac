use super::LoginProvider;
use crate::checker;
use crate::error::VaultError;
use crate::models::{AuthInfo, Login};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// An already-issued Vault token. No login exchange happens: the
/// provided token is the answer.
#[derive(Clone)]
pub struct TokenAuthInfo {
    token: String,
}

impl TokenAuthInfo {
    pub fn new(token: impl Into<String>) -> Result<Self, VaultError> {
        Ok(Self {
            token: checker::not_blank("token", token)?,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

pub(super) struct TokenLogin {
    info: TokenAuthInfo,
}

impl TokenLogin {
    pub(super) fn new(info: TokenAuthInfo) -> Self {
        Self { info }
    }
}

#[async_trait]
impl LoginProvider for TokenLogin {
    async fn login(&self, _cancel: Option<&CancellationToken>) -> Result<Login, VaultError> {
        Ok(Login {
            client_token: self.info.token.clone(),
            auth: AuthInfo::for_raw_token(self.info.token.clone()),
        })
    }
}
