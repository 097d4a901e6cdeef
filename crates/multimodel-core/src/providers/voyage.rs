//! Voyage AI embeddings adapter

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ProviderError, ProviderResult};
use super::http;
use super::traits::{EmbeddingAdapter, EmbeddingCall};
use crate::logging::Logger;
use crate::types::{EmbeddingResult, ProviderId};

pub struct VoyageAdapter {
    client: reqwest::Client,
    base_url: String,
    logger: Arc<dyn Logger>,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
    input_type: &'static str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Value,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    embedding: Option<Vec<f64>>,
}

impl VoyageAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            logger,
        }
    }
}

#[async_trait]
impl EmbeddingAdapter for VoyageAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Voyage
    }

    async fn embed(&self, call: EmbeddingCall<'_>) -> ProviderResult<EmbeddingResult> {
        self.logger.debug(&format!(
            "[VoyageAdapter] embeddings model={} input_type={}",
            call.model,
            call.request.input_type.as_str()
        ));

        let body = EmbeddingsRequest {
            model: call.model,
            input: [call.request.text.as_str()],
            input_type: call.request.input_type.as_str(),
        };

        let request = self
            .client
            .post(http::endpoint(&self.base_url, "embeddings"))
            .bearer_auth(&call.credential.secret)
            .json(&body);

        let text = http::send(ProviderId::Voyage, request, |status| {
            format!("Embeddings API error: {}", status)
        })
        .await?;
        let response: EmbeddingsResponse = http::parse(ProviderId::Voyage, &text)?;

        // Dimensions are derived from the vector, never read from the payload
        let embedding = response
            .data
            .into_iter()
            .next()
            .and_then(|d| d.embedding)
            .ok_or_else(|| ProviderError::invalid_response(ProviderId::Voyage, "reply contained no embedding"))?;

        Ok(EmbeddingResult::new(embedding, response.usage, call.credential.source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::types::{Credential, CredentialSource, EmbeddingRequest, InputType};
    use mockito::Matcher;
    use serde_json::json;

    fn adapter(base: &str) -> VoyageAdapter {
        VoyageAdapter::new(reqwest::Client::new(), base, NoOpLogger::shared())
    }

    fn credential() -> Credential {
        Credential::new(ProviderId::Voyage, "pa-key", CredentialSource::Environment)
    }

    #[tokio::test]
    async fn test_embed_derives_dimensions() {
        let vector: Vec<f64> = (0..1024).map(|i| i as f64 / 1024.0).collect();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer pa-key")
            .match_body(Matcher::Json(json!({
                "model": "voyage-3",
                "input": ["some text"],
                "input_type": "document"
            })))
            .with_status(200)
            .with_body(
                json!({
                    "object": "list",
                    "data": [{"object": "embedding", "embedding": vector, "index": 0}],
                    "model": "voyage-3",
                    "usage": {"total_tokens": 2}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let request = EmbeddingRequest::new("some text");
        let credential = credential();
        let result = adapter(&server.url())
            .embed(EmbeddingCall {
                request: &request,
                model: "voyage-3",
                credential: &credential,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.dimensions(), 1024);
        assert_eq!(result.dimensions(), result.embedding().len());
        assert_eq!(result.usage()["total_tokens"], 2);
        assert_eq!(result.credential_source(), CredentialSource::Environment);
    }

    #[tokio::test]
    async fn test_embed_query_input_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_body(Matcher::PartialJson(json!({"input_type": "query"})))
            .with_status(200)
            .with_body(r#"{"data": [{"embedding": [0.1, 0.2, 0.3]}]}"#)
            .create_async()
            .await;

        let request = EmbeddingRequest::new("find me").with_input_type(InputType::Query);
        let credential = credential();
        let result = adapter(&server.url())
            .embed(EmbeddingCall {
                request: &request,
                model: "voyage-3",
                credential: &credential,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.dimensions(), 3);
    }

    #[tokio::test]
    async fn test_embed_missing_vector_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;

        let request = EmbeddingRequest::new("text");
        let credential = credential();
        let err = adapter(&server.url())
            .embed(EmbeddingCall {
                request: &request,
                model: "voyage-3",
                credential: &credential,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::InvalidResponse { .. }));
    }
}
