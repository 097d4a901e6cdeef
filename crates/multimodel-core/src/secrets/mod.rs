//! Credential tiers
//!
//! Two tiers back the credential store:
//! - `SecretVault`: an async remote vault (`SupabaseVault`), consulted first
//! - `SecretStore`: a synchronous local store (`EnvSecretStore` in
//!   production, `MemorySecretStore` in tests and embedders)

mod traits;
mod env_store;
mod memory_store;
mod vault_store;

pub use traits::{SecretStore, SecretStoreError, SecretStoreResult, SecretVault};
pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
pub use vault_store::{SupabaseVault, VaultSettings};
