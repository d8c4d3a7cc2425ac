use super::LoginProvider;
use crate::error::VaultError;
use crate::models::{AuthInfo, Login};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type TokenRetriever = Arc<dyn Fn() -> BoxFuture<'static, Option<String>> + Send + Sync>;
type AuthInfoRetriever = Arc<dyn Fn() -> BoxFuture<'static, Option<AuthInfo>> + Send + Sync>;

#[derive(Clone)]
enum Delegate {
    Token(TokenRetriever),
    AuthInfo(AuthInfoRetriever),
}

/// A caller-supplied login delegate, the only extension point for auth
/// backends this crate does not model. Two construction modes: a
/// delegate producing a raw token string, or one producing a full
/// [`AuthInfo`]. The delegate is invoked once per login, never cached.
#[derive(Clone)]
pub struct CustomAuthInfo {
    delegate: Delegate,
}

impl CustomAuthInfo {
    pub fn with_token_retriever<F, Fut>(retriever: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Option<String>> + Send + 'static,
    {
        Self {
            delegate: Delegate::Token(Arc::new(move || -> BoxFuture<'static, Option<String>> {
                Box::pin(retriever())
            })),
        }
    }

    pub fn with_auth_info_retriever<F, Fut>(retriever: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Option<AuthInfo>> + Send + 'static,
    {
        Self {
            delegate: Delegate::AuthInfo(Arc::new(
                move || -> BoxFuture<'static, Option<AuthInfo>> { Box::pin(retriever()) },
            )),
        }
    }
}

pub(super) struct CustomLogin {
    info: CustomAuthInfo,
}

impl CustomLogin {
    pub(super) fn new(info: CustomAuthInfo) -> Self {
        Self { info }
    }
}

#[async_trait]
impl LoginProvider for CustomLogin {
    async fn login(&self, _cancel: Option<&CancellationToken>) -> Result<Login, VaultError> {
        match &self.info.delegate {
            Delegate::Token(retriever) => match retriever().await {
                Some(token) if !token.trim().is_empty() => Ok(Login {
                    auth: AuthInfo::for_raw_token(token.clone()),
                    client_token: token,
                }),
                _ => Err(VaultError::MissingClientToken),
            },
            Delegate::AuthInfo(retriever) => match retriever().await {
                Some(auth) if !auth.client_token.trim().is_empty() => Ok(Login {
                    client_token: auth.client_token.clone(),
                    auth,
                }),
                _ => Err(VaultError::MissingClientToken),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_delegate() {
        let info = CustomAuthInfo::with_token_retriever(|| async { Some("t1".to_string()) });
        let login = CustomLogin::new(info).login(None).await.unwrap();
        assert_eq!(login.client_token, "t1");
        assert_eq!(login.auth.lease_duration, 0);
    }

    #[tokio::test]
    async fn test_auth_info_delegate_is_returned_verbatim() {
        let auth = AuthInfo {
            lease_duration: 600,
            renewable: true,
            policies: vec!["web".to_string()],
            ..AuthInfo::for_raw_token("t2")
        };
        let expected = auth.clone();
        let info = CustomAuthInfo::with_auth_info_retriever(move || {
            let auth = auth.clone();
            async move { Some(auth) }
        });

        let login = CustomLogin::new(info).login(None).await.unwrap();
        assert_eq!(login.client_token, "t2");
        assert_eq!(login.auth, expected);
    }

    #[tokio::test]
    async fn test_none_from_delegate_is_a_protocol_error() {
        let info = CustomAuthInfo::with_auth_info_retriever(|| async { None });
        let result = CustomLogin::new(info).login(None).await;
        assert!(matches!(result, Err(VaultError::MissingClientToken)));
    }

    #[tokio::test]
    async fn test_blank_token_from_delegate_is_a_protocol_error() {
        let info = CustomAuthInfo::with_token_retriever(|| async { Some("  ".to_string()) });
        let result = CustomLogin::new(info).login(None).await;
        assert!(matches!(result, Err(VaultError::MissingClientToken)));
    }
}
