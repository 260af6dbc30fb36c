//! MCP server implementation using pmcp (Pragmatic AI's rust-mcp-sdk).
//!
//! This module wires the compliance tools and resources into a pmcp server
//! for JSON-RPC over stdio or streamable HTTP.

use crate::context::AppContext;
use crate::mcp::resources::{ResourceRouter, MIME_JSON};
use crate::mcp::tools::ToolRegistry;
use async_trait::async_trait;
use pmcp::{
    server::streamable_http_server::StreamableHttpServer,
    types::{ListResourcesResult, ReadResourceResult},
    Error, RequestHandlerExtra, ResourceHandler, Server, ServerCapabilities, ToolHandler,
    ToolInfo,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// The MCP server for compliance catalogs
///
/// Exposes control lookup, search and evidence tools plus JSON resources
/// over various transports.
#[derive(Debug, Clone)]
pub struct McpServer {
    server: Arc<Mutex<Server>>,
}

impl McpServer {
    /// Create a new MCP server over the given application context
    pub fn new(ctx: Arc<AppContext>) -> Result<Self, pmcp::Error> {
        let tools = ToolRegistry::from_context(&ctx);
        let resources = ResourceRouter::new(Arc::clone(&ctx));
        let server = Self::build_server_impl(&ctx.config.server.name, tools, resources)?;
        Ok(Self {
            server: Arc::new(Mutex::new(server)),
        })
    }

    /// Get the underlying pmcp server
    pub fn inner(&self) -> Arc<Mutex<Server>> {
        self.server.clone()
    }

    fn build_server_impl(
        name: &str,
        tools: ToolRegistry,
        resources: ResourceRouter,
    ) -> Result<Server, pmcp::Error> {
        let mut builder = Server::builder()
            .name(name)
            .version(env!("CARGO_PKG_VERSION"))
            .capabilities(capabilities());

        for tool in tools.all() {
            let tool_handler = ToolWrapper {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: tool.input_schema.clone(),
                handler: tool.handler.clone(),
            };
            builder = builder.tool(tool_handler.name.clone(), tool_handler);
        }

        builder = builder.resources(ResourceWrapper { router: resources });

        builder.build()
    }

    /// Run the server in stdio mode (for Claude Desktop and other MCP clients)
    ///
    /// Consumes the server; fails if a handle from [`McpServer::inner`] is
    /// still alive.
    pub async fn run(self) -> Result<(), pmcp::Error> {
        tracing::info!("Starting MCP server in stdio mode");

        // run_stdio() takes ownership of the Server
        let server = Arc::try_unwrap(self.server)
            .map_err(|_| Error::internal("Cannot unwrap Arc - multiple references exist"))?
            .into_inner();

        server.run_stdio().await
    }

    /// Run the server in streamable HTTP mode
    pub async fn run_http(&self, addr: &str) -> Result<(SocketAddr, JoinHandle<()>), pmcp::Error> {
        tracing::info!("Starting MCP server in HTTP mode on {}", addr);

        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::invalid_params(format!("Invalid address: {}", e)))?;

        let http_server = StreamableHttpServer::new(socket_addr, self.server.clone());
        http_server.start().await
    }
}

/// Tools and resources, without subscriptions or list-change notifications
fn capabilities() -> ServerCapabilities {
    serde_json::from_value(json!({
        "tools": { "listChanged": false },
        "resources": { "subscribe": false, "listChanged": false }
    }))
    .unwrap_or_default()
}

/// Wrapper for adapting our Tool to pmcp's ToolHandler
#[derive(Clone)]
struct ToolWrapper {
    name: String,
    description: Option<String>,
    input_schema: Value,
    handler: Arc<dyn crate::mcp::tools::ToolHandler>,
}

#[async_trait]
impl ToolHandler for ToolWrapper {
    /// pmcp serializes whatever value a tool returns into the text content,
    /// so the formatted text travels as the `text` field of an object.
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        let text = self.handler.execute(args).await.map_err(|e| {
            tracing::debug!(tool = %self.name, "Tool call failed: {}", e);
            Error::internal(&e)
        })?;

        Ok(json!({ "text": text }))
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        ))
    }
}

/// Wrapper for adapting the resource router to pmcp's ResourceHandler
struct ResourceWrapper {
    router: ResourceRouter,
}

#[async_trait]
impl ResourceHandler for ResourceWrapper {
    async fn read(&self, uri: &str, _extra: RequestHandlerExtra) -> Result<ReadResourceResult, Error> {
        let text = self.router.read(uri).map_err(|e| Error::internal(&e))?;

        serde_json::from_value(json!({
            "contents": [{
                "type": "resource",
                "uri": uri,
                "mimeType": MIME_JSON,
                "text": text
            }]
        }))
        .map_err(|e| Error::internal(e.to_string()))
    }

    async fn list(
        &self,
        _cursor: Option<String>,
        _extra: RequestHandlerExtra,
    ) -> Result<ListResourcesResult, Error> {
        serde_json::from_value(json!({ "resources": self.router.list() }))
            .map_err(|e| Error::internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pmcp::server::cancellation::CancellationManager;

    fn ctx() -> Arc<AppContext> {
        Arc::new(AppContext::load(Config::default()).unwrap())
    }

    async fn extra() -> RequestHandlerExtra {
        let token = CancellationManager::new()
            .create_token("test-call".to_string())
            .await;
        RequestHandlerExtra::new("test-call".to_string(), token)
    }

    fn wrapper(name: &str) -> ToolWrapper {
        let tools = ToolRegistry::from_context(&ctx());
        let tool = tools.get(name).unwrap();
        ToolWrapper {
            name: tool.name.clone(),
            description: Some(tool.description.clone()),
            input_schema: tool.input_schema.clone(),
            handler: tool.handler.clone(),
        }
    }

    #[test]
    fn test_build_server() {
        assert!(McpServer::new(ctx()).is_ok());
    }

    #[tokio::test]
    async fn test_tool_content_carries_plain_text() {
        let result = wrapper("get_control_info")
            .handle(json!({"controlId": "ac-1"}), extra().await)
            .await
            .unwrap();

        // pmcp renders the returned value with `to_string()` into content[0].text
        let content: Value = serde_json::from_str(&result.to_string()).unwrap();
        let text = content["text"].as_str().unwrap();
        assert!(text.starts_with("Control Information: AC-1 - Policy and Procedures\n\nFamily: AC\n"));
        assert!(!text.starts_with('"'));
    }

    #[tokio::test]
    async fn test_tool_failure_is_protocol_error() {
        let err = wrapper("get_control_info")
            .handle(json!({"controlId": "zz-99"}), extra().await)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("control not found: zz-99"));
    }

    #[test]
    fn test_tool_metadata() {
        let info = wrapper("search_controls").metadata().unwrap();
        assert_eq!(info.name, "search_controls");
        assert_eq!(info.input_schema["required"], json!(["query"]));
    }
}
