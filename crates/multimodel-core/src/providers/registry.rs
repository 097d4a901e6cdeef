//! Adapter registry
//!
//! Maps a `(provider, shape)` pair to the adapter that speaks it. The
//! shared HTTP client and each built-in adapter are created lazily, at
//! most once per registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use super::error::{ProviderError, ProviderResult};
use super::gemini::GeminiAdapter;
use super::openai_chat::OpenAiChatAdapter;
use super::openai_responses::OpenAiResponsesAdapter;
use super::traits::{EmbeddingAdapter, ProviderAdapter};
use super::voyage::VoyageAdapter;
use crate::config::ProviderEndpoints;
use crate::logging::Logger;
use crate::types::{ProviderId, RequestShape};

pub struct AdapterRegistry {
    endpoints: ProviderEndpoints,
    timeout: Option<Duration>,
    client: OnceCell<reqwest::Client>,
    adapters: RwLock<HashMap<(ProviderId, RequestShape), Arc<dyn ProviderAdapter>>>,
    embedders: RwLock<HashMap<ProviderId, Arc<dyn EmbeddingAdapter>>>,
    logger: Arc<dyn Logger>,
}

impl AdapterRegistry {
    pub fn new(endpoints: ProviderEndpoints, logger: Arc<dyn Logger>) -> Self {
        Self {
            endpoints,
            timeout: None,
            client: OnceCell::new(),
            adapters: RwLock::new(HashMap::new()),
            embedders: RwLock::new(HashMap::new()),
            logger,
        }
    }

    /// Apply a per-request timeout to the shared client
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }

    /// Install an adapter, replacing any built-in one for the same pair
    pub fn register(&self, adapter: Arc<dyn ProviderAdapter>) {
        let key = (adapter.provider(), adapter.shape());
        self.logger
            .debug(&format!("AdapterRegistry: registered {} {} adapter", key.0, key.1));
        self.adapters.write().insert(key, adapter);
    }

    pub fn register_embedder(&self, adapter: Arc<dyn EmbeddingAdapter>) {
        let provider = adapter.provider();
        self.logger
            .debug(&format!("AdapterRegistry: registered {} embedder", provider));
        self.embedders.write().insert(provider, adapter);
    }

    /// Whether `provider` can be queried in `shape` at all
    pub fn supports(&self, provider: ProviderId, shape: RequestShape) -> bool {
        if shape == RequestShape::Embedding {
            return self.embedders.read().contains_key(&provider) || provider == ProviderId::Voyage;
        }
        self.adapters.read().contains_key(&(provider, shape)) || is_builtin(provider, shape)
    }

    /// Adapter for `(provider, shape)`
    ///
    /// Fails with `Unsupported` before any client is built when no adapter
    /// speaks the pair.
    pub fn adapter(&self, provider: ProviderId, shape: RequestShape) -> ProviderResult<Arc<dyn ProviderAdapter>> {
        if let Some(adapter) = self.adapters.read().get(&(provider, shape)) {
            return Ok(Arc::clone(adapter));
        }
        if !is_builtin(provider, shape) {
            return Err(ProviderError::Unsupported { provider, shape });
        }

        let client = self.client(provider)?;
        let mut adapters = self.adapters.write();
        if let Some(adapter) = adapters.get(&(provider, shape)) {
            return Ok(Arc::clone(adapter));
        }

        let base_url = self.endpoints.base_url(provider).to_string();
        let logger = Arc::clone(&self.logger);
        let adapter: Arc<dyn ProviderAdapter> = match (provider, shape) {
            (ProviderId::OpenAi, RequestShape::Chat) => Arc::new(OpenAiChatAdapter::new(client, base_url, logger)),
            (ProviderId::OpenAi, RequestShape::Responses) => {
                Arc::new(OpenAiResponsesAdapter::new(client, base_url, logger))
            }
            (ProviderId::Google, RequestShape::Chat) => Arc::new(GeminiAdapter::new(client, base_url, logger)),
            _ => return Err(ProviderError::Unsupported { provider, shape }),
        };

        self.logger
            .debug(&format!("AdapterRegistry: created {} {} adapter", provider, shape));
        adapters.insert((provider, shape), Arc::clone(&adapter));
        Ok(adapter)
    }

    /// Embedding adapter for `provider`
    pub fn embedder(&self, provider: ProviderId) -> ProviderResult<Arc<dyn EmbeddingAdapter>> {
        if let Some(adapter) = self.embedders.read().get(&provider) {
            return Ok(Arc::clone(adapter));
        }
        if provider != ProviderId::Voyage {
            return Err(ProviderError::Unsupported {
                provider,
                shape: RequestShape::Embedding,
            });
        }

        let client = self.client(provider)?;
        let mut embedders = self.embedders.write();
        let adapter = embedders.entry(provider).or_insert_with(|| -> Arc<dyn EmbeddingAdapter> {
            Arc::new(VoyageAdapter::new(
                client,
                self.endpoints.base_url(provider),
                Arc::clone(&self.logger),
            ))
        });
        Ok(Arc::clone(adapter))
    }

    fn client(&self, provider: ProviderId) -> ProviderResult<reqwest::Client> {
        self.client
            .get_or_try_init(|| {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()
            })
            .cloned()
            .map_err(|e| ProviderError::http(provider, e))
    }
}

fn is_builtin(provider: ProviderId, shape: RequestShape) -> bool {
    matches!(
        (provider, shape),
        (ProviderId::OpenAi, RequestShape::Chat)
            | (ProviderId::OpenAi, RequestShape::Responses)
            | (ProviderId::Google, RequestShape::Chat)
    )
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .field("adapters", &self.adapters.read().len())
            .finish()
    }
}
