//! Errors surfaced at the tool-call boundary

use thiserror::Error;

use crate::providers::ProviderError;
use crate::resolver::CredentialError;
use crate::types::ProviderId;

/// The three failure kinds a caller can observe
#[derive(Error, Debug)]
pub enum RouterError {
    /// Missing or invalid argument; detected before any network activity
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Neither the vault nor the environment had a key
    #[error("No API key found for {provider} (checked vault and environment)")]
    CredentialsUnavailable { provider: ProviderId },

    /// Transport failure or non-2xx reply from a provider
    #[error("{provider} request failed: {message}")]
    ProviderCallFailed { provider: ProviderId, message: String },
}

impl RouterError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest(message.into())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRequest(_))
    }

    /// Text reported to tool callers. A provider failure carries the
    /// provider's own message without the provider prefix.
    pub fn reason(&self) -> String {
        match self {
            Self::ProviderCallFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<CredentialError> for RouterError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Unavailable { provider } => Self::CredentialsUnavailable { provider },
        }
    }
}

impl From<ProviderError> for RouterError {
    fn from(err: ProviderError) -> Self {
        match err {
            // Nothing was sent: the catalog asked for a shape this provider cannot speak
            ProviderError::Unsupported { provider, shape } => Self::MalformedRequest(format!(
                "{} does not support {} requests",
                provider, shape
            )),
            ProviderError::CallFailed {
                provider, message, ..
            }
            | ProviderError::InvalidResponse { provider, message } => {
                Self::ProviderCallFailed { provider, message }
            }
            ProviderError::Http { provider, source } => Self::ProviderCallFailed {
                provider,
                message: source.to_string(),
            },
        }
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
