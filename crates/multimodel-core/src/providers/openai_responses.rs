//! OpenAI Responses API adapter
//!
//! Used only for models the catalog tags as `responses`. The request
//! carries either the bare prompt or a two-element `[system, user]` input,
//! and the reply's text is spread across typed output items.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ProviderResult;
use super::http;
use super::traits::{AdapterCall, ProviderAdapter};
use crate::logging::Logger;
use crate::types::{ProviderId, QueryResult, RequestShape};

pub struct OpenAiResponsesAdapter {
    client: reqwest::Client,
    base_url: String,
    logger: Arc<dyn Logger>,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: ResponsesInput<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ResponsesInput<'a> {
    Prompt(&'a str),
    Messages([InputMessage<'a>; 2]),
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    output: Option<Vec<OutputItem>>,
    #[serde(default)]
    usage: Value,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: Option<Vec<OutputContent>>,
}

#[derive(Deserialize)]
struct OutputContent {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl OpenAiResponsesAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            logger,
        }
    }

    fn build_input<'a>(call: &AdapterCall<'a>) -> ResponsesInput<'a> {
        match call.request.system() {
            Some(system) => ResponsesInput::Messages([
                InputMessage {
                    role: "system",
                    content: system,
                },
                InputMessage {
                    role: "user",
                    content: &call.request.prompt,
                },
            ]),
            None => ResponsesInput::Prompt(&call.request.prompt),
        }
    }
}

/// Concatenate every `output_text` fragment of every `message` item, in order
fn collect_output_text(output: Option<&[OutputItem]>) -> String {
    output
        .unwrap_or_default()
        .iter()
        .filter(|item| item.kind == "message")
        .flat_map(|item| item.content.iter().flatten())
        .filter(|c| c.kind == "output_text")
        .filter_map(|c| c.text.as_deref())
        .collect()
}

#[async_trait]
impl ProviderAdapter for OpenAiResponsesAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn shape(&self) -> RequestShape {
        RequestShape::Responses
    }

    async fn query(&self, call: AdapterCall<'_>) -> ProviderResult<QueryResult> {
        self.logger.debug(&format!(
            "[OpenAiResponsesAdapter] responses model={}",
            call.model
        ));

        let body = ResponsesRequest {
            model: call.model,
            input: Self::build_input(&call),
            max_output_tokens: call.max_output_tokens,
        };

        let request = self
            .client
            .post(http::endpoint(&self.base_url, "responses"))
            .bearer_auth(&call.credential.secret)
            .json(&body);

        let text = http::send(ProviderId::OpenAi, request, |status| {
            format!("Responses API error: {}", status)
        })
        .await?;
        let response: ResponsesBody = http::parse(ProviderId::OpenAi, &text)?;

        Ok(QueryResult {
            content: collect_output_text(response.output.as_deref()),
            model_used: response.model.unwrap_or_else(|| call.model.to_string()),
            usage: response.usage,
            credential_source: call.credential.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::providers::ProviderError;
    use crate::types::{Credential, CredentialSource, QueryRequest};
    use mockito::Matcher;
    use serde_json::json;

    const MODEL: &str = "gpt-5.2-pro-2025-12-11";

    fn adapter(base: &str) -> OpenAiResponsesAdapter {
        OpenAiResponsesAdapter::new(reqwest::Client::new(), base, NoOpLogger::shared())
    }

    fn credential() -> Credential {
        Credential::new(ProviderId::OpenAi, "sk-test", CredentialSource::Vault)
    }

    #[test]
    fn test_collect_output_text_concatenates_items() {
        let body: ResponsesBody = serde_json::from_value(json!({
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "content": [{"type": "output_text", "text": "a"}]},
                {"type": "message", "content": [{"type": "output_text", "text": "b"}]}
            ]
        }))
        .unwrap();
        assert_eq!(collect_output_text(body.output.as_deref()), "ab");
    }

    #[test]
    fn test_collect_output_text_skips_other_content() {
        let body: ResponsesBody = serde_json::from_value(json!({
            "output": [
                {"type": "message", "content": [
                    {"type": "output_text", "text": "x"},
                    {"type": "refusal", "refusal": "no"},
                    {"type": "output_text", "text": "y"}
                ]}
            ]
        }))
        .unwrap();
        assert_eq!(collect_output_text(body.output.as_deref()), "xy");
    }

    #[test]
    fn test_collect_output_text_empty() {
        let body: ResponsesBody = serde_json::from_value(json!({"output": []})).unwrap();
        assert_eq!(collect_output_text(body.output.as_deref()), "");
        let body: ResponsesBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(collect_output_text(body.output.as_deref()), "");
    }

    #[tokio::test]
    async fn test_bare_prompt_without_system() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/responses")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(json!({
                "model": MODEL,
                "input": "hello",
                "max_output_tokens": 4096
            })))
            .with_status(200)
            .with_body(
                json!({
                    "model": MODEL,
                    "output": [
                        {"type": "message", "content": [{"type": "output_text", "text": "a"}]},
                        {"type": "message", "content": [{"type": "output_text", "text": "b"}]}
                    ],
                    "usage": {"input_tokens": 3, "output_tokens": 2}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let request = QueryRequest::new("hello");
        let credential = credential();
        let call = AdapterCall::new(&request, MODEL, &credential).with_max_output_tokens(Some(4096));
        let result = adapter(&server.url()).query(call).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.content, "ab");
        assert_eq!(result.model_used, MODEL);
        assert_eq!(result.usage["output_tokens"], 2);
        assert_eq!(result.credential_source, CredentialSource::Vault);
    }

    #[tokio::test]
    async fn test_system_instruction_uses_two_element_input() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/responses")
            .match_body(Matcher::PartialJson(json!({
                "input": [
                    {"role": "system", "content": "be terse"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .with_status(200)
            .with_body(r#"{"output": []}"#)
            .create_async()
            .await;

        let request = QueryRequest::new("hello").with_system_instruction("be terse");
        let credential = credential();
        let result = adapter(&server.url())
            .query(AdapterCall::new(&request, MODEL, &credential))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.content, "");
        assert_eq!(result.model_used, MODEL);
    }

    #[tokio::test]
    async fn test_error_body_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/responses")
            .with_status(400)
            .with_body(r#"{"error": {"message": "max_output_tokens too large"}}"#)
            .create_async()
            .await;

        let request = QueryRequest::new("hello");
        let credential = credential();
        let err = adapter(&server.url())
            .query(AdapterCall::new(&request, MODEL, &credential))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::CallFailed { ref message, .. } if message == "max_output_tokens too large"
        ));
    }

    #[tokio::test]
    async fn test_error_without_body_uses_generic_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/responses")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let request = QueryRequest::new("hello");
        let credential = credential();
        let err = adapter(&server.url())
            .query(AdapterCall::new(&request, MODEL, &credential))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::CallFailed { ref message, status: Some(503), .. }
                if message == "Responses API error: 503"
        ));
    }
}
