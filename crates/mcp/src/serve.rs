//! Server side of the stdio transport.
//!
//! [`serve`] reads one JSON-RPC message per line, dispatches it to a
//! [`ToolHandler`] and writes one response line per request. Notifications
//! are consumed silently. The loop ends when the input is closed.

use std::future::Future;

use serde_json::{Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::protocol::{
    CallToolParams, CallToolResult, IncomingMessage, InitializeParams, InitializeResult,
    JsonRpcError, JsonRpcResponse, ListToolsResult, PROTOCOL_VERSION, RequestId,
    ServerCapabilities, ServerInfo, Tool, ToolsCapability, error_codes,
};

/// The tools a server exposes and how to run them.
pub trait ToolHandler: Send + Sync {
    /// Name and version reported from `initialize`.
    fn server_info(&self) -> ServerInfo;

    /// Tool definitions reported from `tools/list`.
    fn tools(&self) -> Vec<Tool>;

    /// Run a tool.
    ///
    /// Failures are reported through [`CallToolResult::error`]; the transport
    /// never sees them as JSON-RPC errors.
    fn call(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> impl Future<Output = CallToolResult> + Send;
}

/// Serve `handler` over the process's stdin and stdout.
pub async fn serve_stdio<H: ToolHandler>(handler: &H) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(handler, stdin, stdout).await
}

/// Serve `handler` over an arbitrary line-framed reader/writer pair.
pub async fn serve<H, R, W>(handler: &H, reader: R, mut writer: W) -> Result<()>
where
    H: ToolHandler,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let Some(response) = handle_line(handler, &line).await else {
            continue;
        };

        let json = serde_json::to_string(&response)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!("input closed, stopping server");
    Ok(())
}

async fn handle_line<H: ToolHandler>(handler: &H, line: &str) -> Option<JsonRpcResponse> {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            warn!("unparseable message: {e}");
            return Some(JsonRpcResponse::failure(
                RequestId::Null,
                JsonRpcError::new(error_codes::PARSE_ERROR, format!("parse error: {e}")),
            ));
        }
    };

    let message: IncomingMessage = match serde_json::from_value(value) {
        Ok(message) => message,
        Err(e) => {
            warn!("invalid request: {e}");
            return Some(JsonRpcResponse::failure(
                RequestId::Null,
                JsonRpcError::new(error_codes::INVALID_REQUEST, format!("invalid request: {e}")),
            ));
        }
    };

    let Some(id) = message.id.clone() else {
        debug!(method = %message.method, "notification");
        return None;
    };

    let response = match dispatch(handler, &message.method, message.params).await {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(error) => JsonRpcResponse::failure(id, error),
    };
    Some(response)
}

async fn dispatch<H: ToolHandler>(
    handler: &H,
    method: &str,
    params: Option<Value>,
) -> std::result::Result<Value, JsonRpcError> {
    debug!(method, "request");

    match method {
        "initialize" => {
            if let Some(params) = params {
                let params: InitializeParams = parse_params(params)?;
                info!(
                    client = %params.client_info.name,
                    protocol = %params.protocol_version,
                    "client connected"
                );
            }
            to_value(InitializeResult {
                protocol_version: PROTOCOL_VERSION.to_string(),
                capabilities: ServerCapabilities {
                    tools: Some(ToolsCapability::default()),
                },
                server_info: handler.server_info(),
            })
        }
        "ping" => Ok(Value::Object(Map::new())),
        "tools/list" => to_value(ListToolsResult {
            tools: handler.tools(),
        }),
        "tools/call" => {
            let params: CallToolParams = parse_params(params.unwrap_or(Value::Null))?;
            info!(tool = %params.name, "calling tool");
            let result = handler
                .call(&params.name, params.arguments.unwrap_or_default())
                .await;
            to_value(result)
        }
        other => Err(JsonRpcError::new(
            error_codes::METHOD_NOT_FOUND,
            format!("method not found: {other}"),
        )),
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    params: Value,
) -> std::result::Result<T, JsonRpcError> {
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::new(error_codes::INVALID_PARAMS, format!("invalid params: {e}")))
}

fn to_value(value: impl serde::Serialize) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value)
        .map_err(|e| JsonRpcError::new(error_codes::INVALID_REQUEST, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    impl ToolHandler for Echo {
        fn server_info(&self) -> ServerInfo {
            ServerInfo {
                name: "echo".to_string(),
                version: Some("0.0.1".to_string()),
            }
        }

        fn tools(&self) -> Vec<Tool> {
            vec![Tool {
                name: "echo".to_string(),
                description: Some("Echo the input".to_string()),
                input_schema: json!({"type": "object"}),
            }]
        }

        async fn call(&self, name: &str, arguments: Map<String, Value>) -> CallToolResult {
            match name {
                "echo" => CallToolResult::text(Value::Object(arguments).to_string()),
                other => CallToolResult::error(format!("unknown tool: {other}")),
            }
        }
    }

    async fn run(input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        serve(&Echo, input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn initialize_then_list() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"t","version":"1"}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let responses = run(input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "echo");
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["tools"][0]["name"], "echo");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_result() {
        let input = r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"nope"}}"#;
        let responses = run(input).await;

        assert_eq!(responses[0]["result"]["isError"], true);
        assert_eq!(responses[0]["result"]["content"][0]["text"], "unknown tool: nope");
    }

    #[tokio::test]
    async fn unknown_method_and_garbage() {
        let input = "{\"jsonrpc\":\"2.0\",\"id\":4,\"method\":\"resources/list\"}\nnot json\n";
        let responses = run(input).await;

        assert_eq!(responses[0]["error"]["code"], error_codes::METHOD_NOT_FOUND);
        assert_eq!(responses[1]["error"]["code"], error_codes::PARSE_ERROR);
        assert!(responses[1]["id"].is_null());
    }
}
