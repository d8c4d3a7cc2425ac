//! vault-client - Rust client for HashiCorp Vault
//!
//! The core is the authentication subsystem and the authenticated
//! request pipeline: one login provider per auth backend, a single
//! request executor that attaches (or deliberately omits) the bearer
//! token, and the CloudFoundry request-signing protocol.
//!
//! ```no_run
//! use vault_client::auth::{AppRoleAuthInfo, AuthMethodInfo};
//! use vault_client::VaultClient;
//!
//! # async fn run() -> Result<(), vault_client::VaultError> {
//! let auth = AppRoleAuthInfo::new("role-id")?.with_secret_id("secret-id")?;
//! let client = VaultClient::builder()
//!     .base_url("http://vault:8200")
//!     .auth(AuthMethodInfo::AppRole(auth))
//!     .build()
//!     .await?;
//!
//! let secret: vault_client::Secret<serde_json::Value> =
//!     client.read("secret/data/app", None).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod checker;
mod client;
mod error;
mod executor;
mod models;

pub use client::{VaultClient, VaultClientBuilder};
pub use error::VaultError;
pub use executor::{RequestExecutor, RequestOptions, TOKEN_HEADER, WRAP_TTL_HEADER};
pub use models::{AuthInfo, Login, Secret, WrapInfo};
pub use tokio_util::sync::CancellationToken;
