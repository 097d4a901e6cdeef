//! Adapter traits

use async_trait::async_trait;

use super::error::ProviderResult;
use crate::types::{
    Credential, EmbeddingRequest, EmbeddingResult, ProviderId, QueryRequest, QueryResult,
    RequestShape,
};

/// Everything an adapter needs for one outbound query
///
/// The credential is borrowed from the `CredentialStore` for the duration
/// of the call; adapters never keep it.
#[derive(Debug, Clone, Copy)]
pub struct AdapterCall<'a> {
    pub request: &'a QueryRequest,
    /// Resolved model identifier (request model or catalog default)
    pub model: &'a str,
    /// Effective token limit; `None` leaves the provider default in place
    pub max_output_tokens: Option<u32>,
    pub credential: &'a Credential,
}

impl<'a> AdapterCall<'a> {
    pub fn new(request: &'a QueryRequest, model: &'a str, credential: &'a Credential) -> Self {
        Self {
            request,
            model,
            max_output_tokens: request.max_output_tokens,
            credential,
        }
    }

    pub fn with_max_output_tokens(mut self, tokens: Option<u32>) -> Self {
        self.max_output_tokens = tokens;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EmbeddingCall<'a> {
    pub request: &'a EmbeddingRequest,
    pub model: &'a str,
    pub credential: &'a Credential,
}

/// Translates one `QueryRequest` into exactly one provider call
///
/// Each adapter speaks one provider's native protocol in one request
/// shape and normalizes the reply into a `QueryResult`. Adapters never
/// retry.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> ProviderId;

    fn shape(&self) -> RequestShape;

    async fn query(&self, call: AdapterCall<'_>) -> ProviderResult<QueryResult>;
}

/// Embedding-style adapter
#[async_trait]
pub trait EmbeddingAdapter: Send + Sync {
    fn provider(&self) -> ProviderId;

    async fn embed(&self, call: EmbeddingCall<'_>) -> ProviderResult<EmbeddingResult>;
}
