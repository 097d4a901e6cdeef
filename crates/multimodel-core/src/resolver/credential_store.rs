//! Tiered, memoizing credential resolution
//!
//! Checks sources in priority order:
//! 1. Vault (`get_api_key` RPC), when configured
//! 2. Environment tier
//!
//! The first non-empty value wins and is cached for the process lifetime.
//! Vault failures are soft: they are logged and resolution continues with
//! the environment tier.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::logging::Logger;
use crate::secrets::{EnvSecretStore, SecretStore, SecretVault, SupabaseVault, VaultSettings};
use crate::types::{Credential, CredentialSource, ProviderId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("No API key found for {provider} (checked vault and environment)")]
    Unavailable { provider: ProviderId },
}

/// What the vault tier did during one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultOutcome {
    /// No vault connection values were supplied
    NotConfigured,
    /// The vault returned the credential
    Found,
    /// The vault answered without a value
    Empty,
    /// The lookup failed; the message was logged and resolution fell through
    Failed(String),
}

/// A resolved credential plus how the tiers behaved
#[derive(Debug, Clone)]
pub struct Resolution {
    pub credential: Credential,
    /// `None` when the credential was served from the cache
    pub vault: Option<VaultOutcome>,
}

/// Builds the vault client on first use
pub type VaultFactory = Box<dyn Fn() -> Option<Arc<dyn SecretVault>> + Send + Sync>;

/// Per-provider credential cache backed by the vault and environment tiers
///
/// Each provider has its own async once-cell, so concurrent resolutions of
/// the same provider run the tiers once and all observe the same value. A
/// failed resolution leaves the cell empty and the next call retries.
pub struct CredentialStore {
    vault_factory: VaultFactory,
    vault: once_cell::sync::OnceCell<Option<Arc<dyn SecretVault>>>,
    environment: Arc<dyn SecretStore>,
    slots: HashMap<ProviderId, tokio::sync::OnceCell<Credential>>,
    logger: Arc<dyn Logger>,
}

impl CredentialStore {
    /// Create a store whose vault (if any) is built from connection values
    pub fn new(
        vault_settings: Option<VaultSettings>,
        environment: Arc<dyn SecretStore>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let factory_logger = Arc::clone(&logger);
        let factory: VaultFactory = Box::new(move || {
            let settings = match vault_settings.clone() {
                Some(settings) => settings,
                None => {
                    factory_logger.info("CredentialStore: no vault credentials, vault unavailable");
                    return None;
                }
            };
            match reqwest::Client::builder().build() {
                Ok(client) => Some(Arc::new(SupabaseVault::new(client, settings)) as Arc<dyn SecretVault>),
                Err(e) => {
                    factory_logger.warn(&format!("CredentialStore: failed to build vault client: {}", e));
                    None
                }
            }
        });
        Self::with_vault_factory(factory, environment, logger)
    }

    /// Create a store with an already-built vault
    pub fn with_vault(vault: Arc<dyn SecretVault>, environment: Arc<dyn SecretStore>, logger: Arc<dyn Logger>) -> Self {
        Self::with_vault_factory(Box::new(move || Some(Arc::clone(&vault))), environment, logger)
    }

    /// Create a store that only consults the environment tier
    pub fn without_vault(environment: Arc<dyn SecretStore>, logger: Arc<dyn Logger>) -> Self {
        Self::with_vault_factory(Box::new(|| None), environment, logger)
    }

    /// Vault settings and keys from the process environment
    pub fn from_env(logger: Arc<dyn Logger>) -> Self {
        Self::new(VaultSettings::from_env(), Arc::new(EnvSecretStore::new()), logger)
    }

    /// Create a store with a custom vault factory
    ///
    /// The factory runs at most once, on the first resolution that misses
    /// the cache.
    pub fn with_vault_factory(
        vault_factory: VaultFactory,
        environment: Arc<dyn SecretStore>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let slots = ProviderId::ALL
            .iter()
            .map(|provider| (*provider, tokio::sync::OnceCell::new()))
            .collect();

        Self {
            vault_factory,
            vault: once_cell::sync::OnceCell::new(),
            environment,
            slots,
            logger,
        }
    }

    /// Resolve the credential for `provider`
    pub async fn resolve(&self, provider: ProviderId) -> Result<Credential, CredentialError> {
        self.resolve_traced(provider).await.map(|resolution| resolution.credential)
    }

    /// Resolve and report what the vault tier did
    pub async fn resolve_traced(&self, provider: ProviderId) -> Result<Resolution, CredentialError> {
        let slot = self.slot(provider)?;
        if let Some(credential) = slot.get() {
            return Ok(Resolution {
                credential: credential.clone(),
                vault: None,
            });
        }

        let mut outcome = None;
        let record = &mut outcome;
        let credential = slot
            .get_or_try_init(|| async move {
                let (result, vault) = self.resolve_tiers(provider).await;
                *record = Some(vault);
                result
            })
            .await?;

        Ok(Resolution {
            credential: credential.clone(),
            vault: outcome,
        })
    }

    /// Cached credential, without resolving
    pub fn cached(&self, provider: ProviderId) -> Option<Credential> {
        self.slots.get(&provider).and_then(|slot| slot.get()).cloned()
    }

    /// Source of the cached credential, without resolving
    pub fn cached_source(&self, provider: ProviderId) -> Option<CredentialSource> {
        self.slots
            .get(&provider)
            .and_then(|slot| slot.get())
            .map(|credential| credential.source)
    }

    fn slot(&self, provider: ProviderId) -> Result<&tokio::sync::OnceCell<Credential>, CredentialError> {
        self.slots
            .get(&provider)
            .ok_or(CredentialError::Unavailable { provider })
    }

    fn vault(&self) -> Option<&Arc<dyn SecretVault>> {
        self.vault.get_or_init(|| (self.vault_factory)()).as_ref()
    }

    async fn resolve_tiers(&self, provider: ProviderId) -> (Result<Credential, CredentialError>, VaultOutcome) {
        let outcome = match self.vault() {
            None => VaultOutcome::NotConfigured,
            Some(vault) => match vault.lookup(provider.vault_key_name()).await {
                Ok(Some(secret)) => {
                    self.logger
                        .info(&format!("CredentialStore: {} key loaded from {}", provider, vault.name()));
                    let credential = Credential::new(provider, secret, CredentialSource::Vault);
                    return (Ok(credential), VaultOutcome::Found);
                }
                Ok(None) => VaultOutcome::Empty,
                Err(e) => {
                    self.logger
                        .warn(&format!("CredentialStore: vault lookup failed for {}: {}", provider, e));
                    VaultOutcome::Failed(e.to_string())
                }
            },
        };

        match self.environment.get(provider.as_str()) {
            Some(secret) => {
                self.logger.info(&format!(
                    "CredentialStore: {} key loaded from {}",
                    provider,
                    self.environment.name()
                ));
                (Ok(Credential::new(provider, secret, CredentialSource::Environment)), outcome)
            }
            None => {
                self.logger
                    .debug(&format!("CredentialStore: no key for {}", provider));
                (Err(CredentialError::Unavailable { provider }), outcome)
            }
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached: Vec<_> = ProviderId::ALL
            .iter()
            .filter(|provider| self.cached(**provider).is_some())
            .collect();
        f.debug_struct("CredentialStore")
            .field("environment", &self.environment.name())
            .field("cached", &cached)
            .finish()
    }
}
