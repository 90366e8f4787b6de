//! MCP server implementation using pmcp.
//!
//! Exposes the report tools over stdio or streamable HTTP.

use crate::mcp::tools::ToolRegistry;
use crate::report::NewsService;
use async_trait::async_trait;
use pmcp::{
    server::streamable_http_server::StreamableHttpServer, Error, RequestHandlerExtra, Server,
    ServerCapabilities, ToolHandler, ToolInfo,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Name announced to MCP clients
pub const SERVER_NAME: &str = "ai-news-mcp";

/// The MCP server wrapping a [`NewsService`]
#[derive(Debug, Clone)]
pub struct McpServer {
    server: Arc<Mutex<Server>>,
}

impl McpServer {
    pub fn new(service: Arc<NewsService>) -> Result<Self, pmcp::Error> {
        let tools = ToolRegistry::from_service(service);
        let server = Self::build_server(tools)?;
        Ok(Self {
            server: Arc::new(Mutex::new(server)),
        })
    }

    fn build_server(tools: ToolRegistry) -> Result<Server, pmcp::Error> {
        let mut builder = Server::builder()
            .name(SERVER_NAME)
            .version(env!("CARGO_PKG_VERSION"))
            .capabilities(ServerCapabilities::default());

        for tool in tools.all() {
            let wrapper = ToolWrapper {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: tool.input_schema.clone(),
                handler: tool.handler.clone(),
            };
            builder = builder.tool(wrapper.name.clone(), wrapper);
        }

        builder.build()
    }

    /// Run the server in stdio mode
    pub async fn run(self) -> Result<(), pmcp::Error> {
        tracing::info!("Starting MCP server in stdio mode");

        // run_stdio() takes ownership of the Server
        let server = Arc::try_unwrap(self.server)
            .map_err(|_| Error::internal("MCP server is still shared"))?
            .into_inner();

        server.run_stdio().await
    }

    /// Run the server over streamable HTTP
    pub async fn run_http(&self, addr: &str) -> Result<(SocketAddr, JoinHandle<()>), pmcp::Error> {
        tracing::info!("Starting MCP server in HTTP mode on {}", addr);

        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::invalid_params(format!("Invalid address: {}", e)))?;

        StreamableHttpServer::new(socket_addr, self.server.clone())
            .start()
            .await
    }
}

/// Adapts a registry [`Tool`](crate::mcp::Tool) to pmcp's `ToolHandler`
#[derive(Clone)]
struct ToolWrapper {
    name: String,
    description: Option<String>,
    input_schema: Value,
    handler: Arc<dyn crate::mcp::tools::ToolHandler>,
}

#[async_trait]
impl ToolHandler for ToolWrapper {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        tracing::debug!("Tool call: {}", self.name);
        self.handler.execute(args).await.map_err(|e| {
            tracing::warn!("Tool {} failed: {}", self.name, e);
            Error::internal(&e)
        })
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        ))
    }
}
