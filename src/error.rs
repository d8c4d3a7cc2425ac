use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault address not set: pass base_url or set VAULT_ADDR")]
    AddressNotSet,

    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("auth method `{0}` is not supported")]
    UnsupportedAuthMethod(String),

    #[error("the login request did not yield a client token, verify that the credentials are valid")]
    MissingClientToken,

    #[error("vault request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Request-failed and transport errors come from the server or the
    /// network; everything else is a client-side condition.
    pub fn is_server_side(&self) -> bool {
        matches!(self, Self::RequestFailed { .. } | Self::Transport(_))
    }
}
