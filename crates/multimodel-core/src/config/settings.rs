//! Router settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{ModelCatalog, ProviderId};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_VOYAGE_BASE_URL: &str = "https://api.voyageai.com/v1";

/// Base URLs for each provider's API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEndpoints {
    pub openai: String,
    #[serde(alias = "google")]
    pub gemini: String,
    pub voyage: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            openai: DEFAULT_OPENAI_BASE_URL.to_string(),
            gemini: DEFAULT_GEMINI_BASE_URL.to_string(),
            voyage: DEFAULT_VOYAGE_BASE_URL.to_string(),
        }
    }
}

impl ProviderEndpoints {
    pub fn base_url(&self, provider: ProviderId) -> &str {
        match provider {
            ProviderId::OpenAi => &self.openai,
            ProviderId::Google => &self.gemini,
            ProviderId::Voyage => &self.voyage,
        }
    }

    /// Point every provider at the same base URL (mock servers)
    pub fn all(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            openai: base_url.clone(),
            gemini: base_url.clone(),
            voyage: base_url,
        }
    }
}

/// Everything the router reads from its configuration file
///
/// Every field has a default, so an empty file (or none at all) yields
/// the built-in endpoints and catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    pub endpoints: ProviderEndpoints,
    /// Per-request timeout in seconds; unset means no client-side timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub catalog: ModelCatalog,
}

impl RouterSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }
}
