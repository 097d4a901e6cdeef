//! In-memory secret store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::SecretStore;

/// Credentials held in memory, keyed by provider name.
///
/// Stands in for the environment tier in tests and for embedders that
/// hand credentials over directly instead of exporting variables.
///
/// ```
/// use multimodel_core::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::from_pairs([("voyage", "pa-test")]);
/// assert!(store.has("voyage"));
///
/// store.set("openai", "sk-test");
/// assert_eq!(store.get("openai"), Some("sk-test".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            secrets: RwLock::new(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Set or replace the value for `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.secrets.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.secrets.write().remove(key)
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.secrets.read().get(key).filter(|value| !value.is_empty()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_set_replace_remove() {
        let store = MemorySecretStore::new();
        assert_eq!(store.get("openai"), None);

        store.set("openai", "sk-1");
        store.set("openai", "sk-2");
        assert_eq!(store.get("openai"), Some("sk-2".to_string()));

        assert_eq!(store.remove("openai"), Some("sk-2".to_string()));
        assert!(!store.has("openai"));
    }

    #[test]
    fn test_empty_value_is_absent() {
        let store = MemorySecretStore::from_pairs([("openai", ""), ("voyage", "pa-1")]);
        assert_eq!(store.get("openai"), None);
        assert!(store.has("voyage"));
    }

    #[test]
    fn test_concurrent_writers() {
        let store = Arc::new(MemorySecretStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.set(format!("key_{}", i), format!("value_{}", i)))
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        for i in 0..8 {
            assert_eq!(store.get(&format!("key_{}", i)), Some(format!("value_{}", i)));
        }
    }
}
