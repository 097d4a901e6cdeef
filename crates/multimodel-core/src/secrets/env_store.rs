//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::SecretStore;
use crate::types::ProviderId;

/// Mapping from provider names to environment variable names
static ENV_VAR_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for provider in ProviderId::ALL {
        m.insert(provider.as_str(), provider.env_var_name());
    }
    m.insert("gemini", ProviderId::Google.env_var_name());
    m
});

/// Secret store that reads from environment variables
///
/// Only reads; the process environment is never modified. Values from a `.env.local` file are visible once the
/// server has loaded it with dotenv.
///
/// # Provider Mapping
///
/// Each provider has exactly one variable:
/// - `openai` → `OPENAI_API_KEY`
/// - `google` / `gemini` → `GEMINI_API_KEY`
/// - `voyage` → `VOYAGE_API_KEY`
///
/// Variables can also be read directly by their full name. An empty
/// value counts as unset.
///
/// # Example
///
/// ```
/// use multimodel_core::secrets::{SecretStore, EnvSecretStore};
///
/// let store = EnvSecretStore::new();
///
/// // These are equivalent if OPENAI_API_KEY is set:
/// let key1 = store.get("openai");
/// let key2 = store.get("OPENAI_API_KEY");
/// ```
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (),
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Get the environment variable name for a provider
    pub fn env_var_for_provider(provider: &str) -> Option<&'static str> {
        ENV_VAR_MAP.get(provider.to_lowercase().as_str()).copied()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(var) = Self::env_var_for_provider(key) {
            return non_empty_var(var);
        }
        non_empty_var(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_env_store_name() {
        let store = EnvSecretStore::new();
        assert_eq!(store.name(), "env");
    }

    #[test]
    fn test_provider_mapping() {
        assert_eq!(EnvSecretStore::env_var_for_provider("openai"), Some("OPENAI_API_KEY"));
        assert_eq!(EnvSecretStore::env_var_for_provider("Gemini"), Some("GEMINI_API_KEY"));
        assert_eq!(EnvSecretStore::env_var_for_provider("google"), Some("GEMINI_API_KEY"));
        assert_eq!(EnvSecretStore::env_var_for_provider("voyage"), Some("VOYAGE_API_KEY"));
        assert_eq!(EnvSecretStore::env_var_for_provider("anthropic"), None);
    }

    #[test]
    #[serial]
    fn test_env_store_get_mapped() {
        env::set_var("VOYAGE_API_KEY", "pa-test-12345");

        let store = EnvSecretStore::new();
        assert_eq!(store.get("voyage"), Some("pa-test-12345".to_string()));
        assert_eq!(store.get("VOYAGE_API_KEY"), Some("pa-test-12345".to_string()));

        env::remove_var("VOYAGE_API_KEY");
        assert_eq!(store.get("voyage"), None);
    }

    #[test]
    #[serial]
    fn test_empty_value_is_absent() {
        env::set_var("GEMINI_API_KEY", "");

        let store = EnvSecretStore::new();
        assert_eq!(store.get("google"), None);
        assert!(!store.has("gemini"));

        env::remove_var("GEMINI_API_KEY");
    }
}
