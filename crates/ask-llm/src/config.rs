//! Backend selection configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which generation backend to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Hosted inference API (`{inputs, parameters}`)
    HuggingFace,
    /// Chat-completion API (`{model, messages, ...}`)
    ChatCompletion,
    /// Ollama server, called directly
    Ollama,
    /// Ollama model behind the lazily loaded pipeline
    Local,
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::HuggingFace
    }
}

/// Generator configuration, usually the `[generator]` table of a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Backend to use
    #[serde(default)]
    pub backend: BackendKind,

    /// Model name; each backend has its own default
    #[serde(default)]
    pub model: Option<String>,

    /// Endpoint override; each backend has its own default
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Environment variable holding the credential, overriding the backend default
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    120
}

impl GeneratorConfig {
    /// Config for a given backend with all defaults
    pub fn for_backend(backend: BackendKind) -> Self {
        Self {
            backend,
            model: None,
            endpoint: None,
            api_key_env: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Transport timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Environment variable the active backend reads its credential from
    ///
    /// `None` for backends that need no credential.
    pub fn credential_env(&self) -> Option<String> {
        let default = match self.backend {
            BackendKind::HuggingFace => crate::huggingface::API_KEY_ENV,
            BackendKind::ChatCompletion => crate::chat::API_KEY_ENV,
            BackendKind::Ollama | BackendKind::Local => return None,
        };
        Some(self.api_key_env.clone().unwrap_or_else(|| default.to_string()))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::for_backend(BackendKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            backend = "chat_completion"
            model = "model-b"
            timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::ChatCompletion);
        assert_eq!(config.model.as_deref(), Some("model-b"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_defaults() {
        let config: GeneratorConfig = toml::from_str("").unwrap();
        assert_eq!(config.backend, BackendKind::HuggingFace);
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_credential_env() {
        let config = GeneratorConfig::for_backend(BackendKind::HuggingFace);
        assert_eq!(config.credential_env().as_deref(), Some("HUGGING_FACE_API_KEY"));

        let mut config = GeneratorConfig::for_backend(BackendKind::ChatCompletion);
        config.api_key_env = Some("MY_KEY".to_string());
        assert_eq!(config.credential_env().as_deref(), Some("MY_KEY"));

        let config = GeneratorConfig::for_backend(BackendKind::Local);
        assert_eq!(config.credential_env(), None);
    }
}
