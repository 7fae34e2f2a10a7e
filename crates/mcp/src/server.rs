//! MCP server management (spawn, communicate, lifecycle).

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, RequestId, Tool,
};

/// Default timeout for MCP operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum output size (1MB).
pub const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Configuration for an MCP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
}

impl ServerConfig {
    /// Config with no extra arguments or environment.
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Handle to a running MCP server.
///
/// The child process is killed when the handle is dropped.
pub struct Server {
    config: ServerConfig,
    process: Mutex<Child>,
    stdin: Mutex<tokio::process::ChildStdin>,
    stdout: Mutex<ResponseReader>,
    next_id: AtomicI64,
    initialized: Mutex<bool>,
    server_info: Mutex<Option<InitializeResult>>,
    tools: Mutex<Vec<Tool>>,
}

impl Server {
    /// Spawn a new MCP server process.
    pub async fn spawn(config: ServerConfig) -> Result<Self> {
        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let spawn_error = |source| Error::Spawn {
            command: config.command.clone(),
            source,
        };

        let mut process = cmd.spawn().map_err(spawn_error)?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| spawn_error(std::io::Error::other("failed to capture stdin")))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| spawn_error(std::io::Error::other("failed to capture stdout")))?;

        debug!(server = %config.name, command = %config.command, "spawned MCP server");

        Ok(Self {
            config,
            process: Mutex::new(process),
            stdin: Mutex::new(stdin),
            stdout: Mutex::new(ResponseReader::new(stdout)),
            next_id: AtomicI64::new(1),
            initialized: Mutex::new(false),
            server_info: Mutex::new(None),
            tools: Mutex::new(Vec::new()),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Initialize the server (must be called before other operations).
    pub async fn initialize(&self) -> Result<&Self> {
        let params = InitializeParams::default();
        let result: InitializeResult = self.request("initialize", Some(params)).await?;

        self.notify("notifications/initialized", None::<()>).await?;

        debug!(
            server = %self.config.name,
            remote = %result.server_info.name,
            protocol = %result.protocol_version,
            "MCP server initialized"
        );

        *self.server_info.lock().await = Some(result);
        *self.initialized.lock().await = true;

        self.refresh_tools().await?;

        Ok(self)
    }

    /// Get server info (after initialization).
    pub async fn server_info(&self) -> Option<InitializeResult> {
        self.server_info.lock().await.clone()
    }

    /// Refresh the list of available tools.
    pub async fn refresh_tools(&self) -> Result<()> {
        let result: ListToolsResult = self.request("tools/list", None::<()>).await?;
        *self.tools.lock().await = result.tools;
        Ok(())
    }

    /// Get the list of available tools.
    pub async fn tools(&self) -> Vec<Tool> {
        self.tools.lock().await.clone()
    }

    /// Call a tool by name.
    ///
    /// A result flagged `isError` by the server comes back as
    /// [`Error::ToolCallFailed`] carrying the joined text content.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult> {
        if !*self.initialized.lock().await {
            return Err(Error::NotInitialized);
        }

        let params = CallToolParams {
            name: name.to_string(),
            arguments,
        };

        let result: CallToolResult = self.request("tools/call", Some(params)).await?;

        if result.is_error {
            return Err(Error::ToolCallFailed(result.joined_text()));
        }

        Ok(result)
    }

    /// Check if the server process is still running.
    pub async fn is_running(&self) -> bool {
        let mut process = self.process.lock().await;
        matches!(process.try_wait(), Ok(None))
    }

    /// Shut down the server.
    ///
    /// Closing stdin lets a well-behaved server exit on its own; the process
    /// is killed if it is still around after a short grace period.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.stdin);

        let mut process = self.process.lock().await;
        match timeout(Duration::from_secs(2), process.wait()).await {
            Ok(Ok(status)) => {
                debug!(server = %self.config.name, %status, "MCP server exited");
            }
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(_) => {
                warn!(server = %self.config.name, "MCP server did not exit, killing it");
                process.kill().await?;
            }
        }

        Ok(())
    }

    // --- Internal methods ---

    fn next_request_id(&self) -> RequestId {
        RequestId::Number(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn request<P, R>(&self, method: &str, params: Option<P>) -> Result<R>
    where
        P: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let id = self.next_request_id();
        let mut request = JsonRpcRequest::new(id.clone(), method);
        if let Some(p) = params {
            request = request.with_params(p);
        }

        let request_json = serde_json::to_string(&request)?;
        self.write_line(&request_json).await?;

        let response = timeout(DEFAULT_TIMEOUT, self.read_response(&id))
            .await
            .map_err(|_| Error::Timeout)??;

        let result_value = response.into_result()?;
        let result: R = serde_json::from_value(result_value)?;

        Ok(result)
    }

    async fn notify<P>(&self, method: &str, params: Option<P>) -> Result<()>
    where
        P: serde::Serialize,
    {
        let mut notification = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
        });
        if let Some(p) = params {
            notification["params"] = serde_json::to_value(p)?;
        }

        let notification_json = serde_json::to_string(&notification)?;
        self.write_line(&notification_json).await
    }

    async fn write_line(&self, line: &str) -> Result<()> {
        let mut stdin = self.stdin.lock().await;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Read the response to `expected`.
    ///
    /// Server notifications are skipped, and so are late replies to earlier
    /// requests whose caller already gave up on them.
    async fn read_response(&self, expected: &RequestId) -> Result<JsonRpcResponse> {
        let mut stdout = self.stdout.lock().await;

        loop {
            let line = stdout.next_line().await?;
            if line.trim_ascii().is_empty() {
                continue;
            }

            let value: Value = serde_json::from_slice(&line)?;
            if value.get("id").is_none() {
                debug!(server = %self.config.name, "skipping server notification");
                continue;
            }

            let response: JsonRpcResponse = serde_json::from_value(value)?;
            if response.id == *expected {
                return Ok(response);
            }
            if is_stale(&response.id, expected) {
                warn!(
                    server = %self.config.name,
                    id = ?response.id,
                    "dropping late response to an abandoned request"
                );
                continue;
            }

            return Err(Error::InvalidResponse(format!(
                "response ID mismatch: expected {expected:?}, got {:?}",
                response.id
            )));
        }
    }
}

/// Ids are handed out in increasing order, so a lower one belongs to a
/// request that timed out or was cancelled.
fn is_stale(got: &RequestId, expected: &RequestId) -> bool {
    matches!((got, expected), (RequestId::Number(got), RequestId::Number(expected)) if got < expected)
}

/// Line reader over the server's stdout.
///
/// Bytes of a line that was only partly read when the caller was cancelled
/// stay in `pending`, so the next read picks up where that one stopped.
struct ResponseReader {
    reader: BufReader<ChildStdout>,
    pending: Vec<u8>,
}

impl ResponseReader {
    fn new(stdout: ChildStdout) -> Self {
        Self {
            reader: BufReader::new(stdout),
            pending: Vec::new(),
        }
    }

    async fn next_line(&mut self) -> Result<Vec<u8>> {
        let bytes_read = self.reader.read_until(b'\n', &mut self.pending).await?;
        if bytes_read == 0 {
            return Err(Error::ServerExited);
        }

        let line = std::mem::take(&mut self.pending);
        if line.len() > MAX_OUTPUT_SIZE {
            return Err(Error::OutputTooLarge {
                size: line.len(),
                max: MAX_OUTPUT_SIZE,
            });
        }
        Ok(line)
    }
}
