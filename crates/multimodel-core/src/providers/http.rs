//! Request/response plumbing shared by the HTTP adapters

use serde::de::DeserializeOwned;

use super::error::{error_message_from_body, ProviderError, ProviderResult};
use crate::types::ProviderId;

/// Send a prepared request and return the body of a 2xx reply
///
/// On a non-2xx status the message comes from the error body when it has
/// one, otherwise from `fallback(status)`.
pub(crate) async fn send(
    provider: ProviderId,
    request: reqwest::RequestBuilder,
    fallback: impl FnOnce(u16) -> String,
) -> ProviderResult<String> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::http(provider, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::http(provider, e))?;

    if !status.is_success() {
        let message = error_message_from_body(&body).unwrap_or_else(|| fallback(status.as_u16()));
        return Err(ProviderError::call_failed(provider, Some(status.as_u16()), message));
    }

    Ok(body)
}

/// Decode a 2xx body
pub(crate) fn parse<T: DeserializeOwned>(provider: ProviderId, body: &str) -> ProviderResult<T> {
    serde_json::from_str(body)
        .map_err(|e| ProviderError::invalid_response(provider, format!("Failed to parse response: {}", e)))
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        assert_eq!(endpoint("https://api.openai.com/v1/", "/responses"), "https://api.openai.com/v1/responses");
        assert_eq!(endpoint("http://127.0.0.1:1234", "embeddings"), "http://127.0.0.1:1234/embeddings");
    }
}
