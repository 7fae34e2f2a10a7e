use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use runtime::{
    AgentLoop, ChatRequest, ChatResponse, ChatSession, Conversation, Error, LlmBackend,
    McpToolHost, Result, Role, ToolDescriptor, ToolError, ToolHost, ToolInvocation, ToolResult,
    Usage,
};

/// Plays back canned replies and records every prompt.
#[derive(Default)]
struct ScriptedChat {
    replies: VecDeque<Result<String>>,
    prompts: Vec<String>,
}

impl ScriptedChat {
    fn new(replies: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())))
    }
}

impl ChatSession for ScriptedChat {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        self.prompts.push(text.to_string());
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(Error::Api("script exhausted".into())))
    }
}

/// Answers with the user's own question.
#[derive(Default)]
struct EchoChat {
    calls: usize,
}

impl ChatSession for EchoChat {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        self.calls += 1;
        let question = text.rsplit_once("Question: ").map_or(text, |(_, q)| q);
        Ok(question.to_string())
    }
}

struct SlowChat;

impl ChatSession for SlowChat {
    async fn send_message(&mut self, _text: &str) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }
}

/// Backend that stalls on its first request and answers the rest at once.
#[derive(Default)]
struct StallsOnce {
    calls: AtomicUsize,
}

impl LlmBackend for StallsOnce {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        Ok(ChatResponse {
            content: format!("seen {} messages", request.messages.len()),
            usage: Usage::default(),
        })
    }
}

type Reply = Box<dyn Fn(&ToolInvocation) -> std::result::Result<ToolResult, ToolError> + Send + Sync>;

struct RecordingHost {
    tools: Vec<ToolDescriptor>,
    calls: Mutex<Vec<ToolInvocation>>,
    reply: Reply,
}

impl RecordingHost {
    fn new(
        reply: impl Fn(&ToolInvocation) -> std::result::Result<ToolResult, ToolError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        let tools = ["get_current_time", "list_files"]
            .into_iter()
            .map(|name| ToolDescriptor {
                name: name.to_string(),
                description: format!("{name} tool"),
                parameters: BTreeMap::new(),
            })
            .collect();
        Self {
            tools,
            calls: Mutex::new(Vec::new()),
            reply: Box::new(reply),
        }
    }

    fn constant(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(ToolResult::new(text.clone())))
    }

    fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl ToolHost for RecordingHost {
    fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    async fn call_tool(
        &self,
        invocation: &ToolInvocation,
    ) -> std::result::Result<ToolResult, ToolError> {
        self.calls.lock().unwrap().push(invocation.clone());
        (self.reply)(invocation)
    }
}

async fn run_session<C: ChatSession, H: ToolHost>(agent: &mut AgentLoop<C, H>, input: &str) -> String {
    let mut output = Vec::new();
    agent.run(input.as_bytes(), &mut output).await.unwrap();
    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn plain_replies_are_printed_verbatim_without_tools() {
    let samples = [
        "hello",
        "The answer is 42.",
        "call:get_current_time()",
        "Sure, CALL:get_current_time()",
        " CALL:get_current_time()",
        "CALL",
    ];

    for sample in samples {
        let mut agent = AgentLoop::new(EchoChat::default(), RecordingHost::constant("unused"));
        let output = run_session(&mut agent, &format!("{sample}\n")).await;

        assert!(output.contains(&format!("\n{sample}\n")), "{sample:?} not echoed in {output:?}");
        assert!(!output.contains("[system]"));
        assert_eq!(agent.chat().calls, 1);
        assert!(agent.tool_host().calls().is_empty());
    }
}

#[tokio::test]
async fn tool_call_then_final_answer() {
    let chat = ScriptedChat::replying(&["CALL:get_current_time()", "The time is X"]);
    let mut agent = AgentLoop::new(chat, RecordingHost::constant("2026-10-17 09:30:00"));

    let output = run_session(&mut agent, "What time is it?\n").await;

    assert_eq!(agent.tool_host().calls(), [ToolInvocation::new("get_current_time")]);
    assert!(agent.tool_host().calls()[0].arguments.is_empty());
    assert!(output.contains("[system] running tool: get_current_time..."));
    assert!(output.contains("\nThe time is X\n"));

    let prompts = &agent.chat().prompts;
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("- get_current_time: get_current_time tool"));
    assert!(prompts[0].ends_with("Question: What time is it?"));
    assert!(prompts[1].contains("2026-10-17 09:30:00"));
}

#[tokio::test]
async fn arguments_in_call_are_not_forwarded() {
    let chat = ScriptedChat::replying(&["CALL:list_files(directory=/nonexistent)", "Nothing there."]);
    let host = RecordingHost::constant("Error: /nonexistent: No such file or directory (os error 2)");
    let mut agent = AgentLoop::new(chat, host);

    let output = run_session(&mut agent, "What is in /nonexistent?\n").await;

    let calls = agent.tool_host().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tool_name, "list_files");
    assert!(calls[0].arguments.is_empty());
    assert!(agent.chat().prompts[1].contains("No such file or directory"));
    assert!(output.contains("Nothing there."));
}

#[tokio::test]
async fn exit_first_line_touches_nothing() {
    for exit in ["exit", "EXIT", "Exit", "  eXiT  "] {
        let mut agent = AgentLoop::new(ScriptedChat::default(), RecordingHost::constant("unused"));
        run_session(&mut agent, &format!("{exit}\nWhat time is it?\n")).await;

        assert!(agent.chat().prompts.is_empty());
        assert!(agent.tool_host().calls().is_empty());
    }
}

#[tokio::test]
async fn end_of_input_ends_the_session() {
    let mut agent = AgentLoop::new(ScriptedChat::replying(&["hi"]), RecordingHost::constant("unused"));
    let output = run_session(&mut agent, "\n\nhello").await;

    assert_eq!(agent.chat().prompts.len(), 1);
    assert!(output.contains("\nhi\n"));
}

#[tokio::test]
async fn tool_errors_become_the_tool_result() {
    let chat = ScriptedChat::replying(&["CALL:format_disk()", "I can't do that."]);
    let host = RecordingHost::new(|call| Err(ToolError::NotFound(call.tool_name.clone())));
    let mut agent = AgentLoop::new(chat, host);

    let output = run_session(&mut agent, "wipe it\n").await;

    assert!(agent.chat().prompts[1].contains("error: unknown tool: format_disk"));
    assert!(output.contains("I can't do that."));
    assert!(!output.contains("\nerror:"));
}

#[tokio::test]
async fn transport_failure_fails_the_turn_but_not_the_session() {
    let chat = ScriptedChat::replying(&["CALL:get_current_time()", "second answer"]);
    let host = RecordingHost::new(|_| Err(ToolError::Transport("server exited unexpectedly".into())));
    let mut agent = AgentLoop::new(chat, host);

    let output = run_session(&mut agent, "time?\nsomething else\n").await;

    assert!(output.contains("error: tool host unavailable: transport: server exited unexpectedly"));
    assert!(output.contains("\nsecond answer\n"));
    assert_eq!(agent.chat().prompts.len(), 2);
}

#[tokio::test]
async fn model_failure_is_reported_and_loop_continues() {
    let chat = ScriptedChat::new([
        Err(Error::Network("connection reset".into())),
        Ok("back online".to_string()),
    ]);
    let mut agent = AgentLoop::new(chat, RecordingHost::constant("unused"));

    let output = run_session(&mut agent, "first\nsecond\n").await;

    assert!(output.contains("error: network error: connection reset"));
    assert!(output.contains("\nback online\n"));
}

#[tokio::test]
async fn slow_model_times_out() {
    let mut agent =
        AgentLoop::new(SlowChat, RecordingHost::constant("unused")).with_timeout(Duration::from_millis(20));

    let output = run_session(&mut agent, "anyone there?\n").await;

    assert!(output.contains("error: model request timed out after 20ms"));
    assert!(agent.tool_host().calls().is_empty());
}

#[tokio::test]
async fn model_timeout_leaves_the_conversation_usable() {
    let chat = Conversation::new(StallsOnce::default());
    let mut agent =
        AgentLoop::new(chat, RecordingHost::constant("unused")).with_timeout(Duration::from_millis(100));

    let output = run_session(&mut agent, "first\nsecond\n").await;

    assert!(output.contains("error: model request timed out after 100ms"));
    assert!(output.contains("\nseen 1 messages\n"));

    let history = agent.chat().history();
    let roles: Vec<Role> = history.iter().map(|m| m.role).collect();
    assert_eq!(roles, [Role::User, Role::Assistant]);
    assert!(history[0].content.ends_with("Question: second"));
}

/// MCP server whose first `tools/call` answer arrives a second late.
#[cfg(unix)]
const LATE_FIRST_CALL: &str = r#"
read -r _; echo '{"jsonrpc":"2.0","id":1,"result":{"protocolVersion":"2024-11-05","capabilities":{"tools":{}},"serverInfo":{"name":"scripted"}}}'
read -r _
read -r _; echo '{"jsonrpc":"2.0","id":2,"result":{"tools":[{"name":"slow","description":"Slow tool","inputSchema":{"type":"object"}}]}}'
read -r _; sleep 1; echo '{"jsonrpc":"2.0","id":3,"result":{"content":[{"type":"text","text":"late"}]}}'
read -r _; echo '{"jsonrpc":"2.0","id":4,"result":{"content":[{"type":"text","text":"on time"}]}}'
read -r _
"#;

#[cfg(unix)]
#[tokio::test]
async fn tool_timeout_leaves_the_tool_host_usable() {
    let config = mcp::ServerConfig::new("scripted", "sh").with_args(["-c", LATE_FIRST_CALL]);
    let host = McpToolHost::spawn(config).await.unwrap();
    let chat = ScriptedChat::replying(&["CALL:slow()", "CALL:slow()", "final answer"]);
    let mut agent = AgentLoop::new(chat, host).with_timeout(Duration::from_millis(800));

    let output = run_session(&mut agent, "first\nsecond\n").await;

    assert!(output.contains("error: tool call timed out after 800ms"));
    assert!(output.contains("\nfinal answer\n"));

    let prompts = &agent.chat().prompts;
    assert_eq!(prompts.len(), 3);
    assert!(prompts[2].contains("on time"), "{}", prompts[2]);
    assert!(!prompts[2].contains("error:"));

    let (_, host) = agent.into_parts();
    host.shutdown().await.unwrap();
}
