mod config;
mod error;

use runtime::{AgentLoop, Conversation, GeminiBackend, McpToolHost, ToolHost};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use error::Result;

const SYSTEM_PROMPT: &str = "You are a helpful assistant with access to local tools. Be concise and direct.";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Exit explicitly: the runtime would otherwise wait on the blocking
    // stdin reader after an interrupt.
    let code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };
    std::process::exit(code);
}

async fn run() -> Result<()> {
    let config = Config::load()?;

    println!("tool-agent v{}", env!("CARGO_PKG_VERSION"));

    let mut builder = GeminiBackend::builder(&config.api_key, &config.model);
    if let Some(base_url) = &config.api_base_url {
        builder = builder.base_url(base_url);
    }
    let backend = builder.build();

    let tools = McpToolHost::spawn(config.tool_server.clone()).await?;
    let tool_names: Vec<&str> = tools.tools().iter().map(|t| t.name.as_str()).collect();

    println!("Model: {}", backend.model());
    println!("Tools: {}", tool_names.join(", "));
    println!("Type 'exit' or Ctrl+D to quit.\n");
    info!(model = %backend, tools = tool_names.len(), "session started");

    let conversation = Conversation::new(backend).with_system(SYSTEM_PROMPT);
    let mut agent = AgentLoop::new(conversation, tools).with_timeout(config.timeout);

    let stdin = BufReader::new(tokio::io::stdin());
    let outcome = tokio::select! {
        result = agent.run(stdin, tokio::io::stdout()) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\nInterrupted.");
            Ok(())
        }
    };

    let (_, tools) = agent.into_parts();
    if let Err(e) = tools.shutdown().await {
        warn!("tool server shutdown failed: {e}");
    }

    outcome?;
    println!("\nSession ended.");
    Ok(())
}
