//! MCP-backed tool host.

use mcp::{Server, ServerConfig};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{ToolDescriptor, ToolError, ToolHost, ToolInvocation, ToolResult};

/// Tool host backed by a spawned MCP server.
///
/// The tool list is read once during [`McpToolHost::spawn`].
pub struct McpToolHost {
    server: Server,
    tools: Vec<ToolDescriptor>,
}

impl McpToolHost {
    /// Spawn the MCP server, run the handshake and cache its tools.
    pub async fn spawn(config: ServerConfig) -> Result<Self, ToolError> {
        let server = Server::spawn(config).await?;
        server.initialize().await?;

        let tools: Vec<ToolDescriptor> = server
            .tools()
            .await
            .into_iter()
            .map(ToolDescriptor::from)
            .collect();

        info!(server = server.name(), tools = tools.len(), "tool host ready");
        Ok(Self { server, tools })
    }

    /// Stop the server process.
    pub async fn shutdown(self) -> Result<(), ToolError> {
        self.server.shutdown().await?;
        Ok(())
    }
}

impl ToolHost for McpToolHost {
    fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    async fn call_tool(&self, invocation: &ToolInvocation) -> Result<ToolResult, ToolError> {
        let name = &invocation.tool_name;
        if !self.tools.iter().any(|tool| &tool.name == name) {
            return Err(ToolError::NotFound(name.clone()));
        }

        let arguments: Map<String, Value> = invocation
            .arguments
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();

        debug!(tool = %name, "calling MCP tool");
        let result = self.server.call_tool(name, Some(arguments)).await?;
        Ok(ToolResult::new(result.joined_text()))
    }
}
