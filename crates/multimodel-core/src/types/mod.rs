//! Core types shared by the resolver, adapters and orchestrator

mod catalog;
mod provider;
mod query;

pub use catalog::{ModelCatalog, ModelEntry, ProviderModels, RequestShape};
pub use provider::{Credential, CredentialSource, ProviderId};
pub use query::{
    BatchResult, EmbeddingRequest, EmbeddingResult, InputType, LegOutcome, ProviderSelection,
    QueryRequest, QueryResult,
};
