//! Tool gateway
//!
//! Exposes the orchestrator as four MCP tools:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  ToolGateway                                 │
//! │                                              │
//! │  query_openai    → query_single(openai)      │
//! │  query_gemini    → query_single(google)      │
//! │  embed_voyage    → embed(voyage)             │
//! │  parallel_query  → query_parallel(...)       │
//! └──────────────────────────────────────────────┘
//!           │
//!           │ tools/list, tools/call
//!           ▼
//!     MCP host (stdio server)
//! ```
//!
//! Every call yields exactly one `rmcp` `CallToolResult`; failures become
//! an `{"error": ...}` payload with `isError` set.

mod gateway;
mod types;

pub use gateway::{ToolGateway, EMBED_VOYAGE, PARALLEL_QUERY, QUERY_GEMINI, QUERY_OPENAI};
pub use types::{failure, is_failure, parse_result, result_text, success, tool_definition};
