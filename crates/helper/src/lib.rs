//! Local tool server exposing a clock and a directory listing over MCP.

mod tools;

pub use tools::{NO_FILES_FOUND, current_time, list_files};

use mcp::{CallToolResult, ServerInfo, Tool, ToolHandler};
use serde_json::{Map, Value, json};

pub const SERVER_NAME: &str = "local-helper";

const GET_CURRENT_TIME: &str = "get_current_time";
const LIST_FILES: &str = "list_files";

/// The tools registered at startup.
#[derive(Debug, Clone)]
pub struct LocalHelper {
    tools: Vec<Tool>,
}

impl LocalHelper {
    pub fn new() -> Self {
        let tools = vec![
            Tool {
                name: GET_CURRENT_TIME.to_string(),
                description: Some("Return the server's current local time.".to_string()),
                input_schema: json!({ "type": "object", "properties": {} }),
            },
            Tool {
                name: LIST_FILES.to_string(),
                description: Some("List the entries of a directory.".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "directory": {
                            "type": "string",
                            "description": "Path of the directory to inspect. Defaults to the current directory.",
                            "default": "."
                        }
                    }
                }),
            },
        ];
        Self { tools }
    }
}

impl Default for LocalHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolHandler for LocalHelper {
    fn server_info(&self) -> ServerInfo {
        ServerInfo {
            name: SERVER_NAME.to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }

    fn tools(&self) -> Vec<Tool> {
        self.tools.clone()
    }

    async fn call(&self, name: &str, arguments: Map<String, Value>) -> CallToolResult {
        match name {
            GET_CURRENT_TIME => CallToolResult::text(current_time()),
            LIST_FILES => match arguments.get("directory") {
                None | Some(Value::Null) => CallToolResult::text(list_files(".").await),
                Some(Value::String(directory)) => CallToolResult::text(list_files(directory).await),
                Some(other) => CallToolResult::error(format!(
                    "invalid argument `directory`: expected a string, got {other}"
                )),
            },
            other => CallToolResult::error(format!("unknown tool: {other}")),
        }
    }
}
