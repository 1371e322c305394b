//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Server answered with an error body
    #[error("Server error (HTTP {status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message from the `{error}` body
        message: String,
    },

    /// Question rejected or not answered
    #[error("{0}")]
    Ask(#[from] ask_core::AskError),

    /// Generation backend error
    #[error("Generator error: {0}")]
    Llm(#[from] ask_llm::LlmError),

    /// Knowledge store error
    #[error("Store error: {0}")]
    Store(#[from] ask_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            CliError::Connection(e.to_string())
        } else if e.is_timeout() {
            CliError::Connection("Request timed out".to_string())
        } else {
            CliError::Connection(e.to_string())
        }
    }
}
