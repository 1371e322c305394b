//! Configuration file parsing for the server.
//!
//! Loads the bind address, store and generator selection, prompt settings
//! and CORS origins from TOML. Credentials never live in the file; they are
//! read from the environment when backends are built.

use ask_core::OrchestratorConfig;
use ask_llm::{BackendKind, GeneratorConfig};
use ask_store::StoreConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Allowed cross-origin callers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Knowledge store and conversation log
    #[serde(default)]
    pub store: StoreConfig,

    /// Generation backend
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Prompt and sampling settings; a preset matching the backend when absent
    #[serde(default)]
    pub prompt: Option<OrchestratorConfig>,

    /// Cross-origin settings
    #[serde(default)]
    pub cors: CorsConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            store: StoreConfig::default(),
            generator: GeneratorConfig::default(),
            prompt: None,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config
            .orchestrator()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    /// Orchestrator settings, falling back to the preset for the backend
    pub fn orchestrator(&self) -> OrchestratorConfig {
        match &self.prompt {
            Some(prompt) => prompt.clone(),
            None if self.generator.backend == BackendKind::Local => OrchestratorConfig::local(),
            None => OrchestratorConfig::remote(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
