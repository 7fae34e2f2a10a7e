//! MCP (Model Context Protocol) over stdio.
//!
//! Both ends of the transport live here: [`Server`] spawns a tool server as a
//! child process and talks to it, and [`serve`] runs the other side of the
//! same line-framed JSON-RPC channel for a [`ToolHandler`].
//!
//! # Example
//!
//! ```no_run
//! use mcp::{Server, ServerConfig};
//!
//! # async fn example() -> mcp::Result<()> {
//! let config = ServerConfig::new("helper", "local-helper");
//!
//! let server = Server::spawn(config).await?;
//! server.initialize().await?;
//!
//! for tool in server.tools().await {
//!     println!("Tool: {}", tool.name);
//! }
//!
//! let result = server.call_tool("get_current_time", None).await?;
//! println!("{}", result.joined_text());
//!
//! server.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod protocol;
mod serve;
mod server;

pub use error::{Error, Result};
pub use protocol::{
    CallToolParams, CallToolResult, IncomingMessage, InitializeParams, InitializeResult,
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ListToolsResult, PROTOCOL_VERSION, RequestId,
    ServerCapabilities, ServerInfo, Tool, ToolContent, ToolsCapability, error_codes,
};
pub use serve::{ToolHandler, serve, serve_stdio};
pub use server::{DEFAULT_TIMEOUT, MAX_OUTPUT_SIZE, Server, ServerConfig};
