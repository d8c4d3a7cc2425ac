//! The single chokepoint for every HTTP interaction with Vault.

use crate::error::VaultError;
use crate::models::Secret;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::future::Future;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const TOKEN_HEADER: &str = "X-Vault-Token";
pub const WRAP_TTL_HEADER: &str = "X-Vault-Wrap-TTL";

/// Per-request knobs: extra headers, response wrapping, and whether the
/// bearer token is attached at all (login calls run unauthenticated).
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub wrap_ttl: Option<String>,
    pub unauthenticated: bool,
}

impl RequestOptions {
    pub fn unauthenticated() -> Self {
        Self {
            unauthenticated: true,
            ..Self::default()
        }
    }

    pub fn with_wrap_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.wrap_ttl = Some(ttl.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Executes Vault API requests: builds the URI, serializes the body,
/// attaches headers, and classifies the response.
///
/// Safe for concurrent use; the only shared state is the bearer token
/// behind an async lock and reqwest's connection pool.
pub struct RequestExecutor {
    base_url: String,
    http: Client,
    token: RwLock<Option<String>>,
}

impl RequestExecutor {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            token: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Same base address, different transport. Used for login protocols
    /// that need their own TLS configuration (client certificates).
    /// The duplicate starts without a token.
    pub fn duplicate_with_client(&self, http: Client) -> Self {
        Self::new(self.base_url.clone(), http)
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    fn request_url(&self, path: &str) -> String {
        format!(
            "{}/v1/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Issue a request and deserialize the response envelope.
    pub async fn vault_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: RequestOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<Secret<T>, VaultError> {
        self.vault_request_with(
            method,
            path,
            body,
            options,
            cancel,
            None::<fn(u16, String) -> Result<Secret<T>, VaultError>>,
        )
        .await
    }

    /// Like [`vault_request`](Self::vault_request), but a non-2xx response
    /// is handed to `on_failure` (status code, raw body text) and its
    /// result is returned as-is. Lets callers map known rejection bodies
    /// ("already initialized", ...) into domain results.
    pub async fn vault_request_with<T, F>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: RequestOptions,
        cancel: Option<&CancellationToken>,
        on_failure: Option<F>,
    ) -> Result<Secret<T>, VaultError>
    where
        T: DeserializeOwned,
        F: FnOnce(u16, String) -> Result<Secret<T>, VaultError> + Send,
    {
        let response = self.send(method, path, body, &options, cancel).await?;
        let status = response.status();
        let text = abortable(response.text(), cancel)
            .await?
            .map_err(|e| VaultError::Transport(e.to_string()))?;

        if status.is_success() {
            // Many mutating endpoints answer 204-style with no body.
            if text.trim().is_empty() {
                return Ok(Secret::default());
            }
            return serde_json::from_str(&text).map_err(VaultError::from);
        }

        debug!(status = status.as_u16(), path, "vault request failed");
        match on_failure {
            Some(handler) => handler(status.as_u16(), text),
            None => Err(VaultError::RequestFailed {
                status: status.as_u16(),
                message: text,
            }),
        }
    }

    /// Issue a request and return the raw response body verbatim.
    pub async fn vault_request_text(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: RequestOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, VaultError> {
        let response = self.send(method, path, body, &options, cancel).await?;
        let status = response.status();
        let text = abortable(response.text(), cancel)
            .await?
            .map_err(|e| VaultError::Transport(e.to_string()))?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(VaultError::RequestFailed {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: &RequestOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<reqwest::Response, VaultError> {
        let url = self.request_url(path);
        let has_body_slot =
            method != Method::GET && method != Method::HEAD && method != Method::DELETE;

        let mut request = self.http.request(method, &url);

        if !options.unauthenticated {
            if let Some(token) = self.token.read().await.as_deref() {
                request = request.header(TOKEN_HEADER, token);
            }
        }
        if let Some(ttl) = &options.wrap_ttl {
            request = request.header(WRAP_TTL_HEADER, ttl);
        }
        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        if let Some(body) = body.filter(|_| has_body_slot) {
            request = request.json(&body);
        }

        debug!(%url, unauthenticated = options.unauthenticated, "sending vault request");
        abortable(request.send(), cancel)
            .await?
            .map_err(|e| VaultError::Transport(e.to_string()))
    }
}

/// Await `fut` unless the cancellation token fires first.
async fn abortable<T>(
    fut: impl Future<Output = T>,
    cancel: Option<&CancellationToken>,
) -> Result<T, VaultError> {
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(VaultError::Cancelled),
                value = fut => Ok(value),
            }
        }
        None => Ok(fut.await),
    }
}
