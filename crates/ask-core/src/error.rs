//! Error types for the Orchestrator

use thiserror::Error;

/// Errors a caller can see from `Orchestrator::handle`
///
/// Messages are safe to show to end users. Upstream causes are logged where
/// they occur and never carried here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    /// The request was rejected before any external call
    #[error("{0}")]
    InvalidInput(String),

    /// The generator failed; the conversation was not logged
    #[error("Failed to generate an answer")]
    GenerationFailed,
}

/// Errors loading orchestrator configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
