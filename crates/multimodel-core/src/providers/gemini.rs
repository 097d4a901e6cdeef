//! Gemini `generateContent` adapter (chat-style)

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ProviderResult;
use super::http;
use super::traits::{AdapterCall, ProviderAdapter};
use crate::logging::Logger;
use crate::types::{ProviderId, QueryResult, RequestShape};

pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    logger: Arc<dyn Logger>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Value,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            logger,
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Google
    }

    fn shape(&self) -> RequestShape {
        RequestShape::Chat
    }

    async fn query(&self, call: AdapterCall<'_>) -> ProviderResult<QueryResult> {
        self.logger.debug(&format!("[GeminiAdapter] generateContent model={}", call.model));

        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [TextPart {
                    text: &call.request.prompt,
                }],
            }],
            system_instruction: call.request.system().map(|text| SystemInstruction {
                parts: [TextPart { text }],
            }),
            generation_config: call
                .max_output_tokens
                .map(|max_output_tokens| GenerationConfig { max_output_tokens }),
        };

        let path = format!("models/{}:generateContent", call.model);
        let request = self
            .client
            .post(http::endpoint(&self.base_url, &path))
            .header("x-goog-api-key", &call.credential.secret)
            .json(&body);

        let text = http::send(ProviderId::Google, request, |status| {
            format!("Gemini API error: {}", status)
        })
        .await?;
        let response: GenerateContentResponse = http::parse(ProviderId::Google, &text)?;

        let content = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(QueryResult {
            content,
            model_used: response
                .model_version
                .unwrap_or_else(|| call.model.to_string()),
            usage: response.usage_metadata,
            credential_source: call.credential.source,
        })
    }
}
