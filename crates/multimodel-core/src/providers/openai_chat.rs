//! OpenAI Chat Completions adapter

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ProviderResult;
use super::http;
use super::traits::{AdapterCall, ProviderAdapter};
use crate::logging::Logger;
use crate::types::{ProviderId, QueryResult, RequestShape};

pub struct OpenAiChatAdapter {
    client: reqwest::Client,
    base_url: String,
    logger: Arc<dyn Logger>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Value,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiChatAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            logger,
        }
    }

    fn build_messages<'a>(call: &AdapterCall<'a>) -> Vec<ChatMessage<'a>> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = call.request.system() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &call.request.prompt,
        });
        messages
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiChatAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn shape(&self) -> RequestShape {
        RequestShape::Chat
    }

    async fn query(&self, call: AdapterCall<'_>) -> ProviderResult<QueryResult> {
        self.logger.debug(&format!(
            "[OpenAiChatAdapter] chat.completions model={}",
            call.model
        ));

        let body = ChatRequest {
            model: call.model,
            messages: Self::build_messages(&call),
            max_completion_tokens: call.max_output_tokens,
        };

        let request = self
            .client
            .post(http::endpoint(&self.base_url, "chat/completions"))
            .bearer_auth(&call.credential.secret)
            .json(&body);

        let text = http::send(ProviderId::OpenAi, request, |status| {
            format!("Chat Completions API error: {}", status)
        })
        .await?;
        let response: ChatResponse = http::parse(ProviderId::OpenAi, &text)?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(QueryResult {
            content,
            model_used: response.model.unwrap_or_else(|| call.model.to_string()),
            usage: response.usage,
            credential_source: call.credential.source,
        })
    }
}
