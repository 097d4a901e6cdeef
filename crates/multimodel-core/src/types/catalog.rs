//! Model catalog: defaults, advisory model lists and request shapes

use serde::{Deserialize, Serialize};

use super::provider::ProviderId;

/// Which wire protocol a model is spoken to with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestShape {
    /// Ordered list of role-tagged messages
    Chat,
    /// Single prompt or short structured input, output as typed items
    Responses,
    /// Text in, vector out
    Embedding,
}

impl std::fmt::Display for RequestShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestShape::Chat => write!(f, "chat"),
            RequestShape::Responses => write!(f, "responses"),
            RequestShape::Embedding => write!(f, "embedding"),
        }
    }
}

/// A model identifier tagged with its request shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub shape: RequestShape,
}

impl ModelEntry {
    pub fn new(id: impl Into<String>, shape: RequestShape) -> Self {
        Self {
            id: id.into(),
            shape,
        }
    }
}

/// Catalog entry for one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderModels {
    /// Model used when a request names none
    pub default: String,
    /// Token limit sent when a request names none (`None` = provider default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_output_tokens: Option<u32>,
    /// Shape used for identifiers that are not listed
    pub fallback_shape: RequestShape,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

impl ProviderModels {
    pub fn openai() -> Self {
        Self {
            default: "gpt-5.2-pro-2025-12-11".to_string(),
            default_max_output_tokens: Some(4096),
            fallback_shape: RequestShape::Chat,
            models: vec![
                ModelEntry::new("gpt-5.2-pro-2025-12-11", RequestShape::Responses),
                ModelEntry::new("gpt-5.2-2025-12-11", RequestShape::Chat),
            ],
        }
    }

    pub fn google() -> Self {
        Self {
            default: "gemini-3-pro-preview".to_string(),
            default_max_output_tokens: None,
            fallback_shape: RequestShape::Chat,
            models: vec![
                ModelEntry::new("gemini-3-pro-preview", RequestShape::Chat),
                ModelEntry::new("gemini-2.5-pro", RequestShape::Chat),
                ModelEntry::new("gemini-2.5-flash", RequestShape::Chat),
            ],
        }
    }

    pub fn voyage() -> Self {
        Self {
            default: "voyage-3".to_string(),
            default_max_output_tokens: None,
            fallback_shape: RequestShape::Embedding,
            models: vec![ModelEntry::new("voyage-3", RequestShape::Embedding)],
        }
    }

    /// Identifiers in catalog order
    pub fn available(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.id.as_str()).collect()
    }

    fn entry(&self, model: &str) -> Option<&ModelEntry> {
        self.models.iter().find(|m| m.id == model)
    }
}

/// Static per-provider model configuration
///
/// The catalog is advisory: an identifier that is not listed is passed
/// through to the provider with the provider's fallback shape, and the
/// provider decides whether it exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    #[serde(default = "ProviderModels::openai")]
    pub openai: ProviderModels,
    #[serde(default = "ProviderModels::google", alias = "gemini")]
    pub google: ProviderModels,
    #[serde(default = "ProviderModels::voyage")]
    pub voyage: ProviderModels,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModelCatalog {
    pub fn builtin() -> Self {
        Self {
            openai: ProviderModels::openai(),
            google: ProviderModels::google(),
            voyage: ProviderModels::voyage(),
        }
    }

    pub fn provider(&self, provider: ProviderId) -> &ProviderModels {
        match provider {
            ProviderId::OpenAi => &self.openai,
            ProviderId::Google => &self.google,
            ProviderId::Voyage => &self.voyage,
        }
    }

    pub fn default_model(&self, provider: ProviderId) -> &str {
        &self.provider(provider).default
    }

    pub fn default_max_output_tokens(&self, provider: ProviderId) -> Option<u32> {
        self.provider(provider).default_max_output_tokens
    }

    pub fn available(&self, provider: ProviderId) -> Vec<&str> {
        self.provider(provider).available()
    }

    pub fn is_listed(&self, provider: ProviderId, model: &str) -> bool {
        self.provider(provider).entry(model).is_some()
    }

    /// Request shape for a model; unlisted models get the provider's fallback
    pub fn shape_for(&self, provider: ProviderId, model: &str) -> RequestShape {
        let models = self.provider(provider);
        models
            .entry(model)
            .map(|m| m.shape)
            .unwrap_or(models.fallback_shape)
    }
}
