use crate::auth::{login_provider, AuthMethodInfo};
use crate::error::VaultError;
use crate::executor::{RequestExecutor, RequestOptions};
use crate::models::{Login, Secret};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct VaultClientBuilder {
    base_url: Option<String>,
    auth: Option<AuthMethodInfo>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl Default for VaultClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth: None,
            timeout: None,
            user_agent: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn auth(mut self, auth: AuthMethodInfo) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client: construct the transport, resolve the login
    /// provider, perform one login, and attach the token to all
    /// subsequent requests.
    pub async fn build(self) -> Result<VaultClient, VaultError> {
        let base_url = self
            .base_url
            .or_else(|| std::env::var("VAULT_ADDR").ok())
            .ok_or(VaultError::AddressNotSet)?;
        let auth = self
            .auth
            .ok_or_else(|| VaultError::invalid_argument("auth", "an auth method is required"))?;

        let mut http = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            http = http.user_agent(user_agent.as_str());
        }
        let http = http
            .build()
            .map_err(|e| VaultError::Transport(e.to_string()))?;

        let method = auth.auth_method_type();
        let executor = Arc::new(RequestExecutor::new(base_url, http));
        let provider = login_provider(auth, Arc::clone(&executor))?;
        let login = provider.login(None).await?;
        executor.set_token(login.client_token.clone()).await;

        info!(
            %method,
            lease_duration = login.auth.lease_duration,
            renewable = login.auth.renewable,
            "authenticated with vault"
        );

        Ok(VaultClient { executor, login })
    }
}

/// Authenticated Vault client: one login at construction, then generic
/// authenticated calls through the shared executor. The typed
/// per-engine API surface sits on top of [`read`](Self::read)/
/// [`write`](Self::write) and is out of scope here.
pub struct VaultClient {
    executor: Arc<RequestExecutor>,
    login: Login,
}

impl VaultClient {
    pub fn builder() -> VaultClientBuilder {
        VaultClientBuilder::new()
    }

    pub fn client_token(&self) -> &str {
        &self.login.client_token
    }

    /// The full auth stanza the login returned (policies, lease, ...).
    pub fn login_info(&self) -> &Login {
        &self.login
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub async fn read<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Secret<T>, VaultError> {
        self.executor
            .vault_request(Method::GET, path, None, RequestOptions::default(), cancel)
            .await
    }

    /// Read with response wrapping: the server returns a one-time
    /// wrapping token in `wrap_info` instead of the raw payload.
    pub async fn read_wrapped<T: DeserializeOwned>(
        &self,
        path: &str,
        wrap_ttl: impl Into<String>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Secret<T>, VaultError> {
        let options = RequestOptions::default().with_wrap_ttl(wrap_ttl);
        self.executor
            .vault_request(Method::GET, path, None, options, cancel)
            .await
    }

    pub async fn write<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
        cancel: Option<&CancellationToken>,
    ) -> Result<Secret<T>, VaultError> {
        self.executor
            .vault_request(
                Method::POST,
                path,
                Some(body),
                RequestOptions::default(),
                cancel,
            )
            .await
    }

    pub async fn delete(
        &self,
        path: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), VaultError> {
        self.executor
            .vault_request::<serde_json::Value>(
                Method::DELETE,
                path,
                None,
                RequestOptions::default(),
                cancel,
            )
            .await?;
        Ok(())
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Secret<T>, VaultError> {
        let path = format!("{}?list=true", path.trim_end_matches('/'));
        self.executor
            .vault_request(Method::GET, &path, None, RequestOptions::default(), cancel)
            .await
    }
}
