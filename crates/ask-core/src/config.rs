//! Configuration for the Orchestrator

use crate::error::ConfigError;
use ask_domain::GenerationParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Company description placed between the context and the question
pub const DEFAULT_PREAMBLE: &str = "You are a knowledgeable assistant for Re:cinq, a company specializing in AI Native and Cloud Native technologies.

About Re:cinq:
- They help businesses integrate AI and Cloud Native technologies
- They offer three main services: Build Foundation, Accelerate Software Delivery, and Drive Strategic Growth
- They have a community called \"Waves of Innovation\" with newsletter, podcast, and resources
- They focus on the transition from Cloud Native to AI Native

Use the context provided to answer questions about Re:cinq accurately. If you don't know something based on the context, say so clearly.";

/// Shorter preamble for small local models
pub const LOCAL_PREAMBLE: &str = "Answer this question about Re:cinq in detail. Re:cinq is a company specializing in AI Native and Cloud Native technologies.";

/// Answer cue closing the prompt
pub const DEFAULT_ANSWER_CUE: &str = "Answer:";

/// Answer cue for small local models
pub const LOCAL_ANSWER_CUE: &str = "Provide a comprehensive answer in 2-3 sentences:";

/// Answer returned when the generator produced no usable text
pub const DEFAULT_FALLBACK_ANSWER: &str = "No response generated";

/// Configuration for the Orchestrator
///
/// Usually the `[prompt]` and `[generation]` tables of a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Fixed text placed after the context block
    pub preamble: String,

    /// Cue placed after the question
    pub answer_cue: String,

    /// Answer substituted when the generator returns no usable text
    pub fallback_answer: String,

    /// Sampling parameters passed to every generation call
    pub params: GenerationParams,
}

impl Default for OrchestratorConfig {
    /// Defaults tuned for hosted backends
    fn default() -> Self {
        Self::remote()
    }
}

impl OrchestratorConfig {
    /// Preset for hosted inference and chat-completion backends
    pub fn remote() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            answer_cue: DEFAULT_ANSWER_CUE.to_string(),
            fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string(),
            params: GenerationParams::remote(),
        }
    }

    /// Preset for the lazily loaded local pipeline
    pub fn local() -> Self {
        Self {
            preamble: LOCAL_PREAMBLE.to_string(),
            answer_cue: LOCAL_ANSWER_CUE.to_string(),
            fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string(),
            params: GenerationParams::local(),
        }
    }

    /// Parse from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_answer.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "fallback_answer must not be empty".to_string(),
            ));
        }
        self.params.validate().map_err(ConfigError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OrchestratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fallback_answer, "No response generated");
        assert_eq!(config.params.max_new_tokens, 1000);
    }

    #[test]
    fn test_local_preset() {
        let config = OrchestratorConfig::local();
        assert!(config.validate().is_ok());
        assert_eq!(config.params, GenerationParams::local());
        assert_eq!(config.fallback_answer, DEFAULT_FALLBACK_ANSWER);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = OrchestratorConfig::from_toml(
            r#"
            answer_cue = "A:"

            [params]
            max_new_tokens = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.answer_cue, "A:");
        assert_eq!(config.preamble, DEFAULT_PREAMBLE);
        assert_eq!(config.params.max_new_tokens, 64);
        assert_eq!(config.params.temperature, 0.7);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(OrchestratorConfig::from_toml("fallback_answer = \"  \"").is_err());
        assert!(OrchestratorConfig::from_toml("[params]\ntemperature = 5.0").is_err());
    }
}
