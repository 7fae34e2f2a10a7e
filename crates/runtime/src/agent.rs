//! The interactive tool-calling loop.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{Instrument, info, info_span, warn};

use crate::conversation::ChatSession;
use crate::parser::parse_tool_call;
use crate::prompt::{decision_prompt, follow_up_prompt};
use crate::tools::ToolHost;
use crate::{Error, Result};

/// Upper bound for each model or tool round-trip.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(60);

/// Input that ends the session, compared case-insensitively.
pub const EXIT_COMMAND: &str = "exit";

/// Drives a session: one line in, one answer out.
///
/// Each turn asks the model whether a tool is needed, runs at most one tool,
/// and asks again for the final answer when it did.
pub struct AgentLoop<C, H> {
    chat: C,
    tools: H,
    timeout: Duration,
}

impl<C: ChatSession, H: ToolHost> AgentLoop<C, H> {
    pub fn new(chat: C, tools: H) -> Self {
        Self {
            chat,
            tools,
            timeout: DEFAULT_TURN_TIMEOUT,
        }
    }

    /// Bound every model and tool round-trip by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn chat(&self) -> &C {
        &self.chat
    }

    pub fn tool_host(&self) -> &H {
        &self.tools
    }

    /// Give back the chat session and tool host, e.g. to shut the host down.
    pub fn into_parts(self) -> (C, H) {
        (self.chat, self.tools)
    }

    /// Read lines until `exit` or end of input.
    ///
    /// Turn failures are printed and the loop carries on; only I/O errors on
    /// `input` or `output` end it early.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send,
    {
        let mut lines = input.lines();
        let mut turn: u64 = 0;

        loop {
            output.write_all(b"> ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                info!("end of input");
                break;
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.eq_ignore_ascii_case(EXIT_COMMAND) {
                info!("exit requested");
                break;
            }

            turn += 1;
            let span = info_span!("turn", turn);
            match self.handle_turn(&line, &mut output).instrument(span).await {
                Ok(answer) => {
                    output.write_all(format!("\n{answer}\n\n").as_bytes()).await?;
                }
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    warn!(turn, "turn failed: {e}");
                    output.write_all(format!("\nerror: {e}\n\n").as_bytes()).await?;
                }
            }
            output.flush().await?;
        }

        Ok(())
    }

    /// Resolve one utterance to an answer.
    ///
    /// A tool that fails (unknown name, bad input, error result) still
    /// produces a result for the model to read. Only a broken tool host,
    /// a model failure or a timeout fails the turn.
    pub async fn handle_turn<W>(&mut self, user_text: &str, output: &mut W) -> Result<String>
    where
        W: AsyncWrite + Unpin + Send,
    {
        info!("turn started");

        let prompt = decision_prompt(self.tools.tools(), user_text);
        let decision = bounded(self.timeout, "model request", self.chat.send_message(&prompt)).await?;

        let Some(invocation) = parse_tool_call(&decision) else {
            info!("turn finished without a tool");
            return Ok(decision);
        };

        output
            .write_all(format!("[system] running tool: {}...\n", invocation.tool_name).as_bytes())
            .await?;
        output.flush().await?;

        let tool_output = match tokio::time::timeout(self.timeout, self.tools.call_tool(&invocation)).await {
            Err(_) => {
                return Err(Error::Timeout {
                    operation: "tool call",
                    after: self.timeout,
                });
            }
            Ok(Ok(result)) => result.content,
            Ok(Err(e)) if e.is_transport() => return Err(e.into()),
            Ok(Err(e)) => {
                warn!(tool = %invocation.tool_name, "tool failed: {e}");
                format!("error: {e}")
            }
        };
        info!(tool = %invocation.tool_name, bytes = tool_output.len(), "tool finished");

        let follow_up = follow_up_prompt(&tool_output);
        let answer = bounded(self.timeout, "model request", self.chat.send_message(&follow_up)).await?;

        info!("turn finished");
        Ok(answer)
    }
}

async fn bounded<T>(
    after: Duration,
    operation: &'static str,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(after, future)
        .await
        .map_err(|_| Error::Timeout { operation, after })?
}
