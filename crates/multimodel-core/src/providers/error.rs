//! Provider error types

use serde_json::Value;
use thiserror::Error;

use crate::types::{ProviderId, RequestShape};

/// Errors that can occur during a provider call
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Non-2xx reply; `message` is the best text the body offered
    #[error("{provider}: {message}")]
    CallFailed {
        provider: ProviderId,
        status: Option<u16>,
        message: String,
    },

    /// 2xx reply that could not be normalized
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: ProviderId, message: String },

    /// No adapter speaks this shape for this provider
    #[error("{provider} has no {shape} adapter")]
    Unsupported {
        provider: ProviderId,
        shape: RequestShape,
    },

    /// Network/HTTP error
    #[error("{provider} HTTP error: {source}")]
    Http {
        provider: ProviderId,
        #[source]
        source: reqwest::Error,
    },
}

impl ProviderError {
    pub fn call_failed(provider: ProviderId, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::CallFailed {
            provider,
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider,
            message: message.into(),
        }
    }

    pub fn http(provider: ProviderId, source: reqwest::Error) -> Self {
        Self::Http { provider, source }
    }

    pub fn provider(&self) -> ProviderId {
        match self {
            Self::CallFailed { provider, .. }
            | Self::InvalidResponse { provider, .. }
            | Self::Unsupported { provider, .. }
            | Self::Http { provider, .. } => *provider,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Pull a human-readable message out of an error body
///
/// Understands `{"error": {"message": ..}}` (OpenAI, Gemini),
/// `{"error": ".."}` and `{"detail": ..}` (Voyage).
pub fn error_message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = match value.get("error") {
        Some(Value::Object(err)) => err.get("message").and_then(Value::as_str),
        Some(Value::String(err)) => Some(err.as_str()),
        _ => None,
    }
    .or_else(|| value.get("detail").and_then(Value::as_str))
    .or_else(|| value.get("message").and_then(Value::as_str))?;

    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
