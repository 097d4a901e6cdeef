//! Core traits and types for secret storage

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during secret store operations
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Vault request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vault returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Store error: {0}")]
    Other(String),
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Local, synchronous credential lookup
///
/// This is the environment tier of credential resolution. Lookups never
/// fail; a missing or empty value is `None`.
///
/// - `EnvSecretStore` reads process environment variables
/// - `MemorySecretStore` holds values in memory for tests and embedders
///
/// ```
/// use multimodel_core::secrets::{SecretStore, EnvSecretStore};
///
/// let store = EnvSecretStore::new();
/// // store.get("openai") checks OPENAI_API_KEY
/// let _ = store.get("openai");
/// ```
pub trait SecretStore: Send + Sync {
    fn name(&self) -> &str;

    /// Look up a secret by provider name (`openai`) or by variable
    /// name (`OPENAI_API_KEY`).
    fn get(&self, key: &str) -> Option<String>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Remote vault lookup
///
/// Unlike `SecretStore`, a vault sits behind the network, so lookups are
/// async and can fail. `Ok(None)` means the vault answered but holds no
/// value for `key_name`.
#[async_trait]
pub trait SecretVault: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, key_name: &str) -> SecretStoreResult<Option<String>>;
}
