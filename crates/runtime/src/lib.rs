//! Runtime for a tool-calling chat agent.
//!
//! # Overview
//!
//! - **LlmBackend**: a stateless chat API (Gemini).
//! - **Conversation**: owns the message history and implements
//!   [`ChatSession`] on top of a backend.
//! - **ToolHost**: lists tools and runs them; [`McpToolHost`] does so through
//!   a spawned MCP server.
//! - **AgentLoop**: reads user lines, lets the model decide on a tool via the
//!   `CALL:` reply convention, runs it, and prints the final answer.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{AgentLoop, Conversation, GeminiBackend, McpToolHost};
//! use mcp::ServerConfig;
//!
//! # async fn example() -> runtime::Result<()> {
//! let backend = GeminiBackend::builder("api-key", runtime::DEFAULT_MODEL).build();
//! let tools = McpToolHost::spawn(ServerConfig::new("helper", "local-helper")).await?;
//!
//! let mut agent = AgentLoop::new(Conversation::new(backend), tools);
//! let stdin = tokio::io::BufReader::new(tokio::io::stdin());
//! agent.run(stdin, tokio::io::stdout()).await?;
//!
//! let (_, tools) = agent.into_parts();
//! tools.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod agent;
mod backend;
mod conversation;
mod error;
mod parser;
mod prompt;
pub mod tools;

pub use agent::{AgentLoop, DEFAULT_TURN_TIMEOUT, EXIT_COMMAND};

pub use backend::{
    ChatRequest, ChatResponse, DEFAULT_MODEL, GeminiBackend, GeminiBackendBuilder, LlmBackend,
    Message, Role, Usage,
};

pub use conversation::{ChatSession, Conversation};

pub use error::{Error, Result};

pub use parser::{CALL_PREFIX, parse_tool_call};
pub use prompt::{decision_prompt, follow_up_prompt};

pub use tools::{
    McpToolHost, Parameter, ToolDescriptor, ToolError, ToolHost, ToolInvocation, ToolResult,
};
