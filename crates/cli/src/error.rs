//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration is invalid or missing required values.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The tool server could not be started.
    #[error("failed to start tool server: {0}")]
    ToolServer(#[from] runtime::ToolError),

    /// An error occurred in the runtime layer.
    #[error(transparent)]
    Runtime(#[from] runtime::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
