//! Mock adapter for testing
//!
//! Provides deterministic, configurable replies without network dependencies.
//! Useful for orchestrator tests and offline runs of the tool server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::error::{ProviderError, ProviderResult};
use super::traits::{AdapterCall, EmbeddingAdapter, EmbeddingCall, ProviderAdapter};
use crate::logging::Logger;
use crate::types::{EmbeddingResult, ProviderId, QueryResult, RequestShape};

/// Mock reply mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the prompt
    #[default]
    Echo,
    /// Return a fixed response
    Fixed(String),
    /// Fail as if the provider returned `status`
    Error { status: u16, message: String },
}

/// Mock adapter that answers without touching the network
pub struct MockAdapter {
    provider: ProviderId,
    shape: RequestShape,
    mode: MockMode,
    delay: Duration,
    dimensions: usize,
    calls: AtomicUsize,
    logger: Arc<dyn Logger>,
}

impl MockAdapter {
    pub fn new(provider: ProviderId, shape: RequestShape, mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider,
            shape,
            mode,
            delay: Duration::ZERO,
            dimensions: 8,
            calls: AtomicUsize::new(0),
            logger,
        }
    }

    /// Create an echo adapter
    pub fn echo(provider: ProviderId, logger: Arc<dyn Logger>) -> Self {
        Self::new(provider, RequestShape::Chat, MockMode::Echo, logger)
    }

    /// Create a fixed response adapter
    pub fn fixed(provider: ProviderId, response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::new(provider, RequestShape::Chat, MockMode::Fixed(response.into()), logger)
    }

    /// Create an error-producing adapter
    pub fn error(provider: ProviderId, message: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::new(
            provider,
            RequestShape::Chat,
            MockMode::Error {
                status: 500,
                message: message.into(),
            },
            logger,
        )
    }

    pub fn with_shape(mut self, shape: RequestShape) -> Self {
        self.shape = shape;
        self
    }

    /// Delay before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Vector length returned by `embed`
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Number of calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn begin(&self) -> ProviderResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let MockMode::Error { status, message } = &self.mode {
            self.logger.debug(&format!("MockAdapter: failing with {}", status));
            return Err(ProviderError::call_failed(
                self.provider,
                Some(*status),
                format!("Mock error: {}", message),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn provider(&self) -> ProviderId {
        self.provider
    }

    fn shape(&self) -> RequestShape {
        self.shape
    }

    async fn query(&self, call: AdapterCall<'_>) -> ProviderResult<QueryResult> {
        self.begin().await?;

        let content = match &self.mode {
            MockMode::Echo => format!("Echo: {}", call.request.prompt),
            MockMode::Fixed(response) => response.clone(),
            MockMode::Error { .. } => String::new(),
        };
        self.logger.debug(&format!("MockAdapter: answering {} chars", content.len()));

        Ok(QueryResult {
            content,
            model_used: call.model.to_string(),
            usage: json!({ "mock": true }),
            credential_source: call.credential.source,
        })
    }
}

#[async_trait]
impl EmbeddingAdapter for MockAdapter {
    fn provider(&self) -> ProviderId {
        self.provider
    }

    async fn embed(&self, call: EmbeddingCall<'_>) -> ProviderResult<EmbeddingResult> {
        self.begin().await?;
        let seed = call.request.text.len() as f64;
        let vector = (0..self.dimensions).map(|i| (seed + i as f64) / 100.0).collect();
        Ok(EmbeddingResult::new(vector, json!({ "mock": true }), call.credential.source))
    }
}
