//! Error types for CLI operations.

use std::path::Path;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Malformed message line on stdin
    #[error("Invalid message on line {line}: {message}")]
    InvalidMessage { line: usize, message: String },

    /// Transport could not be built from configuration
    #[error("Failed to build transport: {0}")]
    Transport(#[from] contracts::ContractError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: &Path) -> Self {
        Self::ConfigNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn invalid_message(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            line,
            message: message.into(),
        }
    }
}
