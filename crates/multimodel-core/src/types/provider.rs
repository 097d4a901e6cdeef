//! Provider identifiers and credentials

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies a credential namespace and an adapter family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(alias = "gemini")]
    Google,
    Voyage,
}

impl ProviderId {
    /// Every known provider, in a stable order
    pub const ALL: [ProviderId; 3] = [ProviderId::OpenAi, ProviderId::Google, ProviderId::Voyage];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Google => "google",
            ProviderId::Voyage => "voyage",
        }
    }

    /// Human-readable name, used in tool descriptions and log lines
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "OpenAI",
            ProviderId::Google => "Gemini",
            ProviderId::Voyage => "Voyage AI",
        }
    }

    /// Name of the secret in the remote vault
    pub fn vault_key_name(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai_api_key",
            ProviderId::Google => "gemini_api_key",
            ProviderId::Voyage => "voyage_api_key",
        }
    }

    /// Environment variable consulted when the vault has nothing
    pub fn env_var_name(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "OPENAI_API_KEY",
            ProviderId::Google => "GEMINI_API_KEY",
            ProviderId::Voyage => "VOYAGE_API_KEY",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderId::OpenAi),
            "google" | "gemini" => Ok(ProviderId::Google),
            "voyage" | "voyageai" => Ok(ProviderId::Voyage),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// Which tier produced a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    Vault,
    Environment,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Vault => f.write_str("vault"),
            CredentialSource::Environment => f.write_str("environment"),
        }
    }
}

/// A resolved provider secret
///
/// Held for the life of the owning `CredentialStore`; adapters only ever
/// borrow it for the duration of one call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub provider: ProviderId,
    pub secret: String,
    pub source: CredentialSource,
}

impl Credential {
    pub fn new(provider: ProviderId, secret: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            provider,
            secret: secret.into(),
            source,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("provider", &self.provider)
            .field("secret", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}
