//! MCP server over stdio, built on the rmcp SDK
//!
//! rmcp owns the JSON-RPC framing, the `initialize` handshake and
//! version negotiation, `ping` and notifications. This module only maps
//! `tools/list` and `tools/call` onto the `ToolGateway`.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParams,
    ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use tracing::{debug, info};

use multimodel_core::ToolGateway;

pub const SERVER_NAME: &str = "multimodel-mcp";

/// `ServerHandler` exposing the router's tools
#[derive(Clone)]
pub struct MultimodelServer {
    gateway: Arc<ToolGateway>,
}

impl MultimodelServer {
    pub fn new(gateway: Arc<ToolGateway>) -> Self {
        Self { gateway }
    }
}

impl ServerHandler for MultimodelServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("Multimodel".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Query OpenAI and Gemini, embed with Voyage, or cross-check both models with parallel_query."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.gateway.list_tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!("tools/call {}", request.name);
        let arguments = request.arguments.map(Value::Object).unwrap_or(Value::Null);
        Ok(self.gateway.call_tool(&request.name, arguments).await)
    }
}

/// Serve on stdin/stdout until the client disconnects
pub async fn serve_stdio(gateway: Arc<ToolGateway>) -> Result<()> {
    let service = MultimodelServer::new(gateway)
        .serve(rmcp::transport::stdio())
        .await
        .context("MCP initialization failed")?;

    let reason = service.waiting().await.context("MCP service task failed")?;
    info!("MCP session ended: {:?}", reason);
    Ok(())
}
