//! Supabase Vault secret lookup
//!
//! Keys live in a Postgres vault exposed through the `get_api_key` RPC
//! function. The function returns the decrypted value as a JSON string,
//! or `null` when the vault holds nothing under that name.

use std::env;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::traits::{SecretStoreError, SecretStoreResult, SecretVault};
use crate::providers::error_message_from_body;

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "EXPO_PUBLIC_SUPABASE_URL"];
const SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Connection values for the vault
#[derive(Clone, PartialEq, Eq)]
pub struct VaultSettings {
    pub url: String,
    pub service_key: String,
}

impl VaultSettings {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_key: service_key.into(),
        }
    }

    /// Read `SUPABASE_URL` (or `EXPO_PUBLIC_SUPABASE_URL`) and
    /// `SUPABASE_SERVICE_ROLE_KEY`
    ///
    /// Returns `None` when either value is missing or empty, which leaves
    /// the vault tier unconfigured.
    pub fn from_env() -> Option<Self> {
        let url = URL_VARS
            .iter()
            .find_map(|name| env::var(name).ok().filter(|v| !v.is_empty()))?;
        let service_key = env::var(SERVICE_KEY_VAR).ok().filter(|v| !v.is_empty())?;
        Some(Self::new(url, service_key))
    }
}

impl std::fmt::Debug for VaultSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSettings")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize)]
struct GetApiKeyParams<'a> {
    key_name: &'a str,
}

/// Vault client speaking the Supabase REST RPC endpoint
pub struct SupabaseVault {
    client: reqwest::Client,
    settings: VaultSettings,
}

impl SupabaseVault {
    pub fn new(client: reqwest::Client, settings: VaultSettings) -> Self {
        Self { client, settings }
    }

    fn rpc_url(&self) -> String {
        format!("{}/rest/v1/rpc/get_api_key", self.settings.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SecretVault for SupabaseVault {
    fn name(&self) -> &str {
        "supabase-vault"
    }

    async fn lookup(&self, key_name: &str) -> SecretStoreResult<Option<String>> {
        let response = self
            .client
            .post(self.rpc_url())
            .header("apikey", &self.settings.service_key)
            .bearer_auth(&self.settings.service_key)
            .json(&GetApiKeyParams { key_name })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SecretStoreError::Remote {
                status: status.as_u16(),
                message: error_message_from_body(&body).unwrap_or_else(|| "get_api_key failed".to_string()),
            });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| SecretStoreError::Other(format!("Failed to parse vault reply: {}", e)))?;

        match value {
            Value::String(secret) if !secret.is_empty() => Ok(Some(secret)),
            Value::String(_) | Value::Null => Ok(None),
            other => Err(SecretStoreError::Other(format!(
                "Unexpected vault reply type: {}",
                json_type(&other)
            ))),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
