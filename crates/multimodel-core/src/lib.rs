//! Multimodel Core
//!
//! A multi-provider LLM query router. This crate provides:
//! - tiered credential resolution (vault, then environment) with
//!   per-process memoization
//! - provider adapters that normalize OpenAI (chat and responses), Gemini
//!   and Voyage replies into one envelope
//! - fan-out queries whose legs fail independently
//! - an MCP tool gateway on top of all of the above
//!
//! ## Tool Gateway
//!
//! ```rust,ignore
//! use multimodel_core::{QueryOrchestrator, RouterSettings, ToolGateway, TracingLogger};
//!
//! let logger = Arc::new(TracingLogger::new());
//! let orchestrator = QueryOrchestrator::from_settings(&RouterSettings::default(), logger.clone());
//! let gateway = ToolGateway::new(Arc::new(orchestrator), logger);
//!
//! let response = gateway
//!     .call_tool("parallel_query", json!({ "prompt": "Is 1 prime?" }))
//!     .await;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod providers;
pub mod resolver;
pub mod secrets;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use types::{
    BatchResult, Credential, CredentialSource, EmbeddingRequest, EmbeddingResult, InputType,
    LegOutcome, ModelCatalog, ModelEntry, ProviderId, ProviderModels, ProviderSelection,
    QueryRequest, QueryResult, RequestShape,
};

pub use error::{RouterError, RouterResult};

pub use secrets::{
    EnvSecretStore, MemorySecretStore, SecretStore, SecretStoreError, SecretVault, SupabaseVault,
    VaultSettings,
};

pub use logging::{Logger, NoOpLogger, SharedLogger, TracingLogger};

pub use config::{ConfigError, ConfigFile, ProviderEndpoints, RouterSettings};

pub use resolver::{CredentialError, CredentialStore, Resolution, VaultOutcome};

pub use providers::{
    AdapterRegistry, EmbeddingAdapter, MockAdapter, ProviderAdapter, ProviderError,
};

pub use orchestrator::QueryOrchestrator;

pub use tools::ToolGateway;
