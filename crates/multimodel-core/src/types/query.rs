//! Request and result envelopes shared by every provider

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::provider::{CredentialSource, ProviderId};
use crate::error::RouterError;

/// A logical, provider-independent query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    /// Falls back to the catalog default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Falls back to the provider default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl QueryRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// System instruction, treating an empty string as absent
    pub fn system(&self) -> Option<&str> {
        self.system_instruction
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    pub fn validate(&self) -> Result<(), RouterError> {
        if self.prompt.trim().is_empty() {
            return Err(RouterError::malformed("prompt is required"));
        }
        Ok(())
    }
}

/// Normalized answer from any chat or responses provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub content: String,
    #[serde(rename = "model")]
    pub model_used: String,
    /// Provider-reported metrics, passed through verbatim
    pub usage: Value,
    #[serde(rename = "key_source")]
    pub credential_source: CredentialSource,
}

/// One provider leg of a parallel query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSelection {
    pub provider: ProviderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ProviderSelection {
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// Settled outcome of a single leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegOutcome {
    Success(QueryResult),
    Failed { error: String },
}

impl LegOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LegOutcome::Success(_))
    }

    pub fn result(&self) -> Option<&QueryResult> {
        match self {
            LegOutcome::Success(result) => Some(result),
            LegOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LegOutcome::Success(_) => None,
            LegOutcome::Failed { error } => Some(error),
        }
    }
}

/// Per-provider outcomes of a fan-out; every selected provider has a key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchResult {
    legs: BTreeMap<ProviderId, LegOutcome>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, provider: ProviderId, outcome: LegOutcome) {
        self.legs.insert(provider, outcome);
    }

    pub fn get(&self, provider: ProviderId) -> Option<&LegOutcome> {
        self.legs.get(&provider)
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn providers(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.legs.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProviderId, &LegOutcome)> {
        self.legs.iter()
    }

    pub fn failed_count(&self) -> usize {
        self.legs.values().filter(|o| !o.is_success()).count()
    }
}

impl FromIterator<(ProviderId, LegOutcome)> for BatchResult {
    fn from_iter<I: IntoIterator<Item = (ProviderId, LegOutcome)>>(iter: I) -> Self {
        Self {
            legs: iter.into_iter().collect(),
        }
    }
}

/// Embedding input discriminator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Document,
    Query,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Document => "document",
            InputType::Query => "query",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub text: String,
    #[serde(default)]
    pub input_type: InputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl EmbeddingRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            input_type: InputType::Document,
            model: None,
        }
    }

    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn validate(&self) -> Result<(), RouterError> {
        if self.text.trim().is_empty() {
            return Err(RouterError::malformed("text is required"));
        }
        Ok(())
    }
}

/// Embedding vector with its derived dimension count
///
/// `dimensions` is computed from the vector on construction and can never
/// disagree with it, whatever the provider reports separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingResult {
    embedding: Vec<f64>,
    dimensions: usize,
    usage: Value,
    #[serde(rename = "key_source")]
    credential_source: CredentialSource,
}

impl EmbeddingResult {
    pub fn new(embedding: Vec<f64>, usage: Value, credential_source: CredentialSource) -> Self {
        Self {
            dimensions: embedding.len(),
            embedding,
            usage,
            credential_source,
        }
    }

    pub fn embedding(&self) -> &[f64] {
        &self.embedding
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn usage(&self) -> &Value {
        &self.usage
    }

    pub fn credential_source(&self) -> CredentialSource {
        self.credential_source
    }
}
