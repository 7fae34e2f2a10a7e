//! Tool host trait.

use std::future::Future;

use crate::tools::{ToolDescriptor, ToolError, ToolInvocation, ToolResult};

/// Trait for tool execution hosts.
///
/// Implementations provide tool descriptors and execute tool invocations.
/// This is the boundary between the agent loop and side effects.
pub trait ToolHost: Send + Sync {
    /// Tools known to the host, fixed for the life of the session.
    fn tools(&self) -> &[ToolDescriptor];

    /// Run one invocation.
    fn call_tool(
        &self,
        invocation: &ToolInvocation,
    ) -> impl Future<Output = Result<ToolResult, ToolError>> + Send;
}
