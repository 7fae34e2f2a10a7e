use thiserror::Error;

/// Errors that can occur during tool execution.
///
/// Only [`ToolError::Transport`] means the host itself is in trouble; the
/// other variants describe a single call and are shown to the model as the
/// tool's result.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("execution failed: {0}")]
    Execution(String),
    #[error("transport: {0}")]
    Transport(String),
}

impl ToolError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<mcp::Error> for ToolError {
    fn from(e: mcp::Error) -> Self {
        match e {
            mcp::Error::ToolCallFailed(text) => Self::Execution(text),
            mcp::Error::JsonRpc(rpc) if rpc.code == mcp::error_codes::INVALID_PARAMS => {
                Self::InvalidInput(rpc.message)
            }
            e if e.is_transport() => Self::Transport(e.to_string()),
            e => Self::Execution(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcp_errors_are_classified() {
        assert!(ToolError::from(mcp::Error::ServerExited).is_transport());
        assert!(ToolError::from(mcp::Error::Timeout).is_transport());

        let failed = ToolError::from(mcp::Error::ToolCallFailed("boom".into()));
        assert!(matches!(failed, ToolError::Execution(ref text) if text == "boom"));

        let rpc = mcp::JsonRpcError::new(mcp::error_codes::INVALID_PARAMS, "bad name");
        assert!(matches!(ToolError::from(mcp::Error::JsonRpc(rpc)), ToolError::InvalidInput(_)));
    }
}
