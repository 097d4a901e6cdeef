//! Tool dispatch onto the orchestrator

use std::sync::Arc;

use rmcp::model::{CallToolResult, Tool};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Number, Value};

use crate::error::{RouterError, RouterResult};
use crate::logging::Logger;
use crate::orchestrator::QueryOrchestrator;
use crate::types::{BatchResult, EmbeddingRequest, InputType, ProviderId, ProviderSelection, QueryRequest};

use super::types::{failure, success, tool_definition};

pub const QUERY_OPENAI: &str = "query_openai";
pub const QUERY_GEMINI: &str = "query_gemini";
pub const EMBED_VOYAGE: &str = "embed_voyage";
pub const PARALLEL_QUERY: &str = "parallel_query";

#[derive(Debug, Deserialize)]
struct QueryArgs {
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    system_prompt: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    max_tokens: Option<Number>,
}

#[derive(Debug, Deserialize)]
struct EmbedArgs {
    #[serde(default)]
    text: String,
    #[serde(default)]
    input_type: Option<InputType>,
}

#[derive(Debug, Deserialize)]
struct ParallelArgs {
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    system_prompt: Option<String>,
    #[serde(default)]
    openai_model: Option<String>,
    #[serde(default)]
    gemini_model: Option<String>,
    #[serde(default)]
    providers: Option<Vec<ProviderId>>,
}

/// Routes MCP tool calls to a `QueryOrchestrator`
pub struct ToolGateway {
    orchestrator: Arc<QueryOrchestrator>,
    logger: Arc<dyn Logger>,
}

impl ToolGateway {
    pub fn new(orchestrator: Arc<QueryOrchestrator>, logger: Arc<dyn Logger>) -> Self {
        Self { orchestrator, logger }
    }

    pub fn orchestrator(&self) -> &QueryOrchestrator {
        &self.orchestrator
    }

    /// Tool definitions, with model hints taken from the catalog
    pub fn list_tools(&self) -> Vec<Tool> {
        let catalog = self.orchestrator.catalog();
        let openai = catalog.available(ProviderId::OpenAi);
        let gemini = catalog.available(ProviderId::Google);
        let openai_default = catalog.default_model(ProviderId::OpenAi);
        let gemini_default = catalog.default_model(ProviderId::Google);
        let voyage_default = catalog.default_model(ProviderId::Voyage);
        let openai_tokens = catalog
            .default_max_output_tokens(ProviderId::OpenAi)
            .map(|n| format!("Max tokens (default: {})", n))
            .unwrap_or_else(|| "Max tokens".to_string());

        vec![
            tool_definition(
                QUERY_OPENAI,
                format!("Query OpenAI models ({})", openai.join(", ")),
                json!({
                    "type": "object",
                    "properties": {
                        "prompt": { "type": "string", "description": "The prompt to send" },
                        "system_prompt": { "type": "string", "description": "Optional system prompt" },
                        "model": {
                            "type": "string",
                            "description": format!("Model (default: {})", openai_default),
                            "enum": openai,
                        },
                        "max_tokens": { "type": "number", "description": openai_tokens },
                    },
                    "required": ["prompt"],
                }),
            ),
            tool_definition(
                QUERY_GEMINI,
                format!("Query Gemini models ({})", gemini.join(", ")),
                json!({
                    "type": "object",
                    "properties": {
                        "prompt": { "type": "string", "description": "The prompt to send" },
                        "system_prompt": { "type": "string", "description": "Optional system instruction" },
                        "model": {
                            "type": "string",
                            "description": format!("Model (default: {})", gemini_default),
                            "enum": gemini,
                        },
                        "max_tokens": { "type": "number", "description": "Max output tokens (default: model limit)" },
                    },
                    "required": ["prompt"],
                }),
            ),
            tool_definition(
                EMBED_VOYAGE,
                format!("Get Voyage AI embeddings ({})", voyage_default),
                json!({
                    "type": "object",
                    "properties": {
                        "text": { "type": "string", "description": "Text to embed" },
                        "input_type": {
                            "type": "string",
                            "description": "Type (document or query)",
                            "enum": ["document", "query"],
                        },
                    },
                    "required": ["text"],
                }),
            ),
            tool_definition(
                PARALLEL_QUERY,
                "Query OpenAI and Gemini in parallel for cross-validation",
                json!({
                    "type": "object",
                    "properties": {
                        "prompt": { "type": "string", "description": "Prompt for both models" },
                        "system_prompt": { "type": "string", "description": "Optional system prompt" },
                        "openai_model": {
                            "type": "string",
                            "description": format!("OpenAI model (default: {})", openai_default),
                            "enum": openai,
                        },
                        "gemini_model": {
                            "type": "string",
                            "description": format!("Gemini model (default: {})", gemini_default),
                            "enum": gemini,
                        },
                        "providers": {
                            "type": "array",
                            "description": "Subset of providers to query (default: openai and gemini)",
                            "items": { "type": "string", "enum": ["openai", "gemini"] },
                        },
                    },
                    "required": ["prompt"],
                }),
            ),
        ]
    }

    /// Run a tool; never fails, errors become an `isError` payload
    pub async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        self.logger.info(&format!("ToolGateway: {}", name));

        let outcome = match name {
            QUERY_OPENAI => self.query(ProviderId::OpenAi, name, arguments).await,
            QUERY_GEMINI => self.query(ProviderId::Google, name, arguments).await,
            EMBED_VOYAGE => self.embed(name, arguments).await,
            PARALLEL_QUERY => self.parallel(name, arguments).await,
            _ => Err(format!("Unknown tool: {}", name)),
        };

        match outcome {
            Ok(response) => response,
            Err(message) => {
                self.logger.warn(&format!("ToolGateway: {} failed: {}", name, message));
                failure(message)
            }
        }
    }

    async fn query(&self, provider: ProviderId, tool: &str, arguments: Value) -> Result<CallToolResult, String> {
        let args: QueryArgs = decode(tool, arguments).map_err(|e| e.to_string())?;

        let mut request = QueryRequest::new(args.prompt);
        request.system_instruction = args.system_prompt;
        request.model = args.model;
        request.max_output_tokens = max_tokens(args.max_tokens).map_err(|e| e.to_string())?;

        let result = self
            .orchestrator
            .query_single(provider, &request)
            .await
            .map_err(|e| e.reason())?;
        Ok(success(&result))
    }

    async fn embed(&self, tool: &str, arguments: Value) -> Result<CallToolResult, String> {
        let args: EmbedArgs = decode(tool, arguments).map_err(|e| e.to_string())?;
        let request = EmbeddingRequest::new(args.text).with_input_type(args.input_type.unwrap_or_default());

        let result = self
            .orchestrator
            .embed(ProviderId::Voyage, &request)
            .await
            .map_err(|e| e.reason())?;
        Ok(success(&result))
    }

    async fn parallel(&self, tool: &str, arguments: Value) -> Result<CallToolResult, String> {
        let args: ParallelArgs = decode(tool, arguments).map_err(|e| e.to_string())?;

        let selections = match args.providers {
            None => QueryOrchestrator::default_selections(args.openai_model, args.gemini_model),
            Some(providers) => providers
                .into_iter()
                .map(|provider| {
                    let model = match provider {
                        ProviderId::OpenAi => args.openai_model.clone(),
                        ProviderId::Google => args.gemini_model.clone(),
                        ProviderId::Voyage => {
                            return Err(RouterError::malformed("voyage cannot answer queries").to_string())
                        }
                    };
                    Ok(ProviderSelection::new(provider).with_model(model))
                })
                .collect::<Result<Vec<_>, String>>()?,
        };

        let batch = self
            .orchestrator
            .query_parallel(&args.prompt, args.system_prompt.as_deref(), &selections)
            .await
            .map_err(|e| e.reason())?;
        Ok(success(&batch_payload(&batch)))
    }
}

/// `parallel_query` keys each leg by its tool family: `openai`, `gemini`
fn batch_payload(batch: &BatchResult) -> Map<String, Value> {
    batch
        .iter()
        .map(|(provider, outcome)| {
            let key = match provider {
                ProviderId::Google => "gemini",
                other => other.as_str(),
            };
            let value = serde_json::to_value(outcome).unwrap_or_else(|e| json!({ "error": e.to_string() }));
            (key.to_string(), value)
        })
        .collect()
}

/// Decode tool arguments; absent arguments count as an empty object
fn decode<T: DeserializeOwned>(tool: &str, arguments: Value) -> RouterResult<T> {
    let arguments = match arguments {
        Value::Null => json!({}),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| RouterError::malformed(format!("invalid arguments for {}: {}", tool, e)))
}

/// `max_tokens` may arrive as an integer or an integral float
fn max_tokens(value: Option<Number>) -> RouterResult<Option<u32>> {
    let Some(number) = value else {
        return Ok(None);
    };
    let tokens = number
        .as_u64()
        .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| RouterError::malformed(format!("max_tokens must be a positive integer, got {}", number)))?;
    Ok(Some(tokens))
}
