//! Query orchestration
//!
//! `QueryOrchestrator` owns the credential store, the adapter registry and
//! the model catalog, and runs single, fan-out and embedding queries
//! against them.
//!
//! ```rust,ignore
//! use multimodel_core::{QueryOrchestrator, RouterSettings, TracingLogger};
//!
//! let orchestrator = QueryOrchestrator::from_settings(&RouterSettings::default(), Arc::new(TracingLogger::new()));
//! let selections = QueryOrchestrator::default_selections(None, None);
//! let batch = orchestrator.query_parallel("Is P = NP?", None, &selections).await?;
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use crate::config::RouterSettings;
use crate::error::{RouterError, RouterResult};
use crate::logging::Logger;
use crate::providers::{AdapterCall, AdapterRegistry, EmbeddingCall};
use crate::resolver::CredentialStore;
use crate::types::{
    BatchResult, EmbeddingRequest, EmbeddingResult, LegOutcome, ModelCatalog, ProviderId,
    ProviderSelection, QueryRequest, QueryResult,
};

pub struct QueryOrchestrator {
    credentials: Arc<CredentialStore>,
    adapters: Arc<AdapterRegistry>,
    catalog: ModelCatalog,
    logger: Arc<dyn Logger>,
}

impl QueryOrchestrator {
    pub fn new(
        credentials: Arc<CredentialStore>,
        adapters: Arc<AdapterRegistry>,
        catalog: ModelCatalog,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            credentials,
            adapters,
            catalog,
            logger,
        }
    }

    /// Build from settings, reading vault and provider keys from the
    /// process environment
    pub fn from_settings(settings: &RouterSettings, logger: Arc<dyn Logger>) -> Self {
        let credentials = Arc::new(CredentialStore::from_env(Arc::clone(&logger)));
        let adapters = Arc::new(
            AdapterRegistry::new(settings.endpoints.clone(), Arc::clone(&logger))
                .with_timeout(settings.request_timeout()),
        );
        Self::new(credentials, adapters, settings.catalog.clone(), logger)
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    /// The fixed cross-validation set: OpenAI then Gemini
    pub fn default_selections(openai_model: Option<String>, gemini_model: Option<String>) -> Vec<ProviderSelection> {
        vec![
            ProviderSelection::new(ProviderId::OpenAi).with_model(openai_model),
            ProviderSelection::new(ProviderId::Google).with_model(gemini_model),
        ]
    }

    /// Query one provider
    ///
    /// Everything up to the credential lookup is local; a malformed
    /// request or an unsupported model shape never reaches the network.
    pub async fn query_single(&self, provider: ProviderId, request: &QueryRequest) -> RouterResult<QueryResult> {
        request.validate()?;

        let model = request
            .model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| self.catalog.default_model(provider));
        let shape = self.catalog.shape_for(provider, model);
        let adapter = self.adapters.adapter(provider, shape)?;

        let credential = self.credentials.resolve(provider).await?;
        let max_output_tokens = request
            .max_output_tokens
            .or_else(|| self.catalog.default_max_output_tokens(provider));

        self.logger.debug(&format!(
            "QueryOrchestrator: {} {} via {} ({} key)",
            provider, model, shape, credential.source
        ));

        let call = AdapterCall::new(request, model, &credential).with_max_output_tokens(max_output_tokens);
        adapter.query(call).await.map_err(|e| {
            self.logger.warn(&format!("QueryOrchestrator: {}", e));
            RouterError::from(e)
        })
    }

    /// Query several providers concurrently and wait for every leg
    ///
    /// Only a malformed request fails the whole call. Each leg's failure
    /// is recorded under its own provider key.
    pub async fn query_parallel(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        selections: &[ProviderSelection],
    ) -> RouterResult<BatchResult> {
        let mut base = QueryRequest::new(prompt);
        base.system_instruction = system_instruction.map(str::to_string);
        base.validate()?;

        if selections.is_empty() {
            return Err(RouterError::malformed("at least one provider must be selected"));
        }
        let mut seen = HashSet::new();
        for selection in selections {
            if !seen.insert(selection.provider) {
                return Err(RouterError::malformed(format!(
                    "{} selected more than once",
                    selection.provider
                )));
            }
        }

        self.logger.info(&format!(
            "QueryOrchestrator: fanning out to {} providers",
            selections.len()
        ));

        let legs = selections.iter().map(|selection| {
            let mut request = base.clone();
            request.model = selection.model.clone();
            async move {
                let outcome = match self.query_single(selection.provider, &request).await {
                    Ok(result) => LegOutcome::Success(result),
                    Err(e) => LegOutcome::Failed { error: e.reason() },
                };
                (selection.provider, outcome)
            }
        });

        let batch: BatchResult = join_all(legs).await.into_iter().collect();
        if batch.failed_count() > 0 {
            self.logger.warn(&format!(
                "QueryOrchestrator: {} of {} legs failed",
                batch.failed_count(),
                batch.len()
            ));
        }
        Ok(batch)
    }

    /// Embed a text with an embedding provider
    pub async fn embed(&self, provider: ProviderId, request: &EmbeddingRequest) -> RouterResult<EmbeddingResult> {
        request.validate()?;

        let model = request
            .model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| self.catalog.default_model(provider));
        let adapter = self.adapters.embedder(provider)?;

        let credential = self.credentials.resolve(provider).await?;
        self.logger.debug(&format!(
            "QueryOrchestrator: embedding with {} {} ({})",
            provider,
            model,
            request.input_type.as_str()
        ));

        let call = EmbeddingCall {
            request,
            model,
            credential: &credential,
        };
        adapter.embed(call).await.map_err(|e| {
            self.logger.warn(&format!("QueryOrchestrator: {}", e));
            RouterError::from(e)
        })
    }
}

impl std::fmt::Debug for QueryOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryOrchestrator")
            .field("adapters", &self.adapters)
            .field("credentials", &self.credentials)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderEndpoints;
    use crate::logging::NoOpLogger;
    use crate::providers::{MockAdapter, ProviderAdapter};
    use crate::secrets::MemorySecretStore;
    use crate::types::{CredentialSource, InputType, RequestShape};
    use serde_json::json;
    use std::time::Duration;

    fn logger() -> Arc<dyn Logger> {
        NoOpLogger::shared()
    }

    fn keys() -> Arc<MemorySecretStore> {
        Arc::new(MemorySecretStore::from_pairs([
            ("openai", "sk-test"),
            ("google", "g-test"),
            ("voyage", "pa-test"),
        ]))
    }

    fn orchestrator(endpoints: ProviderEndpoints, env: Arc<MemorySecretStore>) -> QueryOrchestrator {
        QueryOrchestrator::new(
            Arc::new(CredentialStore::without_vault(env, logger())),
            Arc::new(AdapterRegistry::new(endpoints, logger())),
            ModelCatalog::builtin(),
            logger(),
        )
    }

    fn shared(adapter: MockAdapter) -> Arc<dyn ProviderAdapter> {
        Arc::new(adapter)
    }

    fn with_mocks(adapters: Vec<Arc<dyn ProviderAdapter>>) -> QueryOrchestrator {
        let orchestrator = orchestrator(ProviderEndpoints::all("http://127.0.0.1:1"), keys());
        for adapter in adapters {
            orchestrator.adapters().register(adapter);
        }
        orchestrator
    }

    #[tokio::test]
    async fn test_query_single_uses_catalog_default() {
        let mock = Arc::new(
            MockAdapter::fixed(ProviderId::OpenAi, "answer", logger()).with_shape(RequestShape::Responses),
        );
        let orchestrator = with_mocks(vec![mock.clone() as Arc<dyn ProviderAdapter>]);

        let result = orchestrator
            .query_single(ProviderId::OpenAi, &QueryRequest::new("hello"))
            .await
            .unwrap();

        assert_eq!(result.content, "answer");
        assert_eq!(result.model_used, "gpt-5.2-pro-2025-12-11");
        assert_eq!(result.credential_source, CredentialSource::Environment);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_query_single_dispatches_chat_model() {
        let chat = Arc::new(MockAdapter::fixed(ProviderId::OpenAi, "chat", logger()));
        let responses = Arc::new(
            MockAdapter::fixed(ProviderId::OpenAi, "responses", logger()).with_shape(RequestShape::Responses),
        );
        let orchestrator = with_mocks(vec![
            chat.clone() as Arc<dyn ProviderAdapter>,
            responses.clone() as Arc<dyn ProviderAdapter>,
        ]);

        let request = QueryRequest::new("hello").with_model("gpt-5.2-2025-12-11");
        let result = orchestrator.query_single(ProviderId::OpenAi, &request).await.unwrap();

        assert_eq!(result.content, "chat");
        assert_eq!(responses.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_prompt_makes_no_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let orchestrator = orchestrator(ProviderEndpoints::all(server.url()), keys());

        for prompt in ["", "   "] {
            let err = orchestrator
                .query_single(ProviderId::OpenAi, &QueryRequest::new(prompt))
                .await
                .unwrap_err();
            assert!(err.is_malformed());

            let err = orchestrator
                .query_parallel(prompt, None, &QueryOrchestrator::default_selections(None, None))
                .await
                .unwrap_err();
            assert!(err.is_malformed());
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let orchestrator = orchestrator(ProviderEndpoints::default(), Arc::new(MemorySecretStore::new()));
        let err = orchestrator
            .query_single(ProviderId::Google, &QueryRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, RouterError::CredentialsUnavailable { provider: ProviderId::Google }));
    }

    #[tokio::test]
    async fn test_unsupported_shape_is_malformed() {
        let orchestrator = with_mocks(vec![]);
        let request = QueryRequest::new("hi").with_model("voyage-3");
        let err = orchestrator.query_single(ProviderId::Voyage, &request).await.unwrap_err();

        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_parallel_contains_leg_failure() {
        let orchestrator = with_mocks(vec![
            shared(MockAdapter::error(ProviderId::OpenAi, "upstream exploded", logger()).with_shape(RequestShape::Responses)),
            shared(MockAdapter::fixed(ProviderId::Google, "gemini says hi", logger())),
        ]);

        let batch = orchestrator
            .query_parallel("hi", Some("be brief"), &QueryOrchestrator::default_selections(None, None))
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        let openai = batch.get(ProviderId::OpenAi).unwrap();
        assert_eq!(openai.error(), Some("Mock error: upstream exploded"));
        let google = batch.get(ProviderId::Google).unwrap();
        assert_eq!(google.result().unwrap().content, "gemini says hi");
    }

    #[tokio::test]
    async fn test_parallel_transport_failure_over_http() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-3-pro-preview:generateContent")
            .match_header("x-goog-api-key", "g-test")
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{"content": {"parts": [{"text": "pong"}]}}],
                    "usageMetadata": {"totalTokenCount": 3},
                    "modelVersion": "gemini-3-pro-preview"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let endpoints = ProviderEndpoints {
            openai: "http://127.0.0.1:1".to_string(),
            gemini: server.url(),
            voyage: "http://127.0.0.1:1".to_string(),
        };
        let orchestrator = orchestrator(endpoints, keys());

        let batch = orchestrator
            .query_parallel("ping", None, &QueryOrchestrator::default_selections(None, None))
            .await
            .unwrap();

        assert_eq!(batch.providers().collect::<Vec<_>>(), vec![ProviderId::OpenAi, ProviderId::Google]);
        assert!(!batch.get(ProviderId::OpenAi).unwrap().is_success());
        let google = batch.get(ProviderId::Google).unwrap().result().unwrap();
        assert_eq!(google.content, "pong");
        assert_eq!(google.usage, json!({"totalTokenCount": 3}));
    }

    #[tokio::test]
    async fn test_parallel_out_of_order_completion() {
        let orchestrator = with_mocks(vec![
            shared(
                MockAdapter::fixed(ProviderId::OpenAi, "slow", logger())
                    .with_shape(RequestShape::Responses)
                    .with_delay(Duration::from_millis(60)),
            ),
            shared(MockAdapter::fixed(ProviderId::Google, "fast", logger())),
        ]);

        let batch = orchestrator
            .query_parallel("race", None, &QueryOrchestrator::default_selections(None, None))
            .await
            .unwrap();

        assert_eq!(batch.get(ProviderId::OpenAi).unwrap().result().unwrap().content, "slow");
        assert_eq!(batch.get(ProviderId::Google).unwrap().result().unwrap().content, "fast");
    }

    #[tokio::test]
    async fn test_parallel_legs_overlap() {
        let orchestrator = with_mocks(vec![
            shared(
                MockAdapter::fixed(ProviderId::OpenAi, "a", logger())
                    .with_shape(RequestShape::Responses)
                    .with_delay(Duration::from_millis(200)),
            ),
            shared(MockAdapter::fixed(ProviderId::Google, "b", logger()).with_delay(Duration::from_millis(200))),
        ]);

        let started = std::time::Instant::now();
        orchestrator
            .query_parallel("overlap", None, &QueryOrchestrator::default_selections(None, None))
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_millis(390));
    }

    #[tokio::test]
    async fn test_parallel_selection_validation() {
        let orchestrator = with_mocks(vec![]);

        let err = orchestrator.query_parallel("hi", None, &[]).await.unwrap_err();
        assert!(err.is_malformed());

        let duplicated = vec![ProviderSelection::new(ProviderId::Google), ProviderSelection::new(ProviderId::Google)];
        let err = orchestrator.query_parallel("hi", None, &duplicated).await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_parallel_model_overrides() {
        let orchestrator = with_mocks(vec![
            shared(MockAdapter::echo(ProviderId::OpenAi, logger())),
            shared(MockAdapter::echo(ProviderId::Google, logger())),
        ]);
        let selections = QueryOrchestrator::default_selections(
            Some("gpt-5.2-2025-12-11".to_string()),
            Some("gemini-2.5-flash".to_string()),
        );

        let batch = orchestrator.query_parallel("hi", None, &selections).await.unwrap();

        assert_eq!(batch.get(ProviderId::OpenAi).unwrap().result().unwrap().model_used, "gpt-5.2-2025-12-11");
        assert_eq!(batch.get(ProviderId::Google).unwrap().result().unwrap().model_used, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_embed() {
        let orchestrator = with_mocks(vec![]);
        orchestrator
            .adapters()
            .register_embedder(Arc::new(MockAdapter::echo(ProviderId::Voyage, logger()).with_dimensions(1024)));

        let request = EmbeddingRequest::new("embed me").with_input_type(InputType::Query);
        let result = orchestrator.embed(ProviderId::Voyage, &request).await.unwrap();

        assert_eq!(result.dimensions(), 1024);
        assert_eq!(result.embedding().len(), 1024);
    }

    #[tokio::test]
    async fn test_embed_requires_text() {
        let orchestrator = with_mocks(vec![]);
        let err = orchestrator
            .embed(ProviderId::Voyage, &EmbeddingRequest::new(""))
            .await
            .unwrap_err();
        assert!(err.is_malformed());

        let err = orchestrator
            .embed(ProviderId::OpenAi, &EmbeddingRequest::new("text"))
            .await
            .unwrap_err();
        assert!(err.is_malformed());
    }
}
