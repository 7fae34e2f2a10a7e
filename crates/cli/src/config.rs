//! Configuration from `agent.toml` and the environment.
//!
//! The API key only ever comes from the environment. Everything else has a
//! default, may be set in the optional config file, and may be overridden by
//! environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mcp::ServerConfig;
use runtime::{DEFAULT_MODEL, DEFAULT_TURN_TIMEOUT};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "agent.toml";

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "AGENT_MODEL";
pub const TOOL_SERVER_VAR: &str = "AGENT_TOOL_SERVER";
pub const CONFIG_PATH_VAR: &str = "AGENT_CONFIG";

const TOOL_SERVER_BIN: &str = "local-helper";

/// Contents of the optional config file.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Model to use.
    pub model: Option<String>,

    /// API root, for proxies and test servers.
    pub api_base_url: Option<String>,

    /// Upper bound for each model or tool round-trip.
    pub timeout_secs: Option<u64>,

    /// Tool server to spawn.
    pub tool_server: Option<ToolServerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Resolved configuration for one session.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base_url: Option<String>,
    pub timeout: Duration,
    pub tool_server: ServerConfig,
}

impl Config {
    /// Load from the config file (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        let file = if path.exists() {
            FileConfig::load(&path)?
        } else {
            FileConfig::default()
        };

        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Combine file settings with values looked up by `env`.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = env(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = env(MODEL_VAR)
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout = match file.timeout_secs {
            Some(0) => return Err(ConfigError::InvalidTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TURN_TIMEOUT,
        };

        let tool_server = match env(TOOL_SERVER_VAR) {
            Some(command_line) => parse_command_line(&command_line)?,
            None => file.tool_server.unwrap_or_else(default_tool_server),
        };

        Ok(Self {
            api_key,
            model,
            api_base_url: file.api_base_url,
            timeout,
            tool_server: ServerConfig::new(TOOL_SERVER_BIN, tool_server.command)
                .with_args(tool_server.args),
        })
    }
}

impl FileConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn parse_command_line(command_line: &str) -> Result<ToolServerConfig, ConfigError> {
    let mut parts = command_line.split_whitespace().map(str::to_string);
    let command = parts.next().ok_or(ConfigError::EmptyToolServer)?;
    Ok(ToolServerConfig {
        command,
        args: parts.collect(),
    })
}

/// `local-helper` next to this executable, or on `PATH` otherwise.
fn default_tool_server() -> ToolServerConfig {
    let sibling = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TOOL_SERVER_BIN)))
        .filter(|path| path.exists());

    ToolServerConfig {
        command: sibling
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|| TOOL_SERVER_BIN.to_string()),
        args: Vec::new(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("timeout_secs must be greater than zero")]
    InvalidTimeout,

    #[error("AGENT_TOOL_SERVER is set but empty")]
    EmptyToolServer,
}
