//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local API. This is the pipeline that
//! `OllamaLoader` constructs for the local-generation variant.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama API
//! - Configurable endpoint and model
//! - Model availability check and warm-up for lazy loading
//!
//! # Examples
//!
//! ```no_run
//! use ask_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.2");
//! ```

use crate::response::{ollama_response, parse_body, send};
use crate::LlmError;
use ask_domain::traits::AnswerGenerator;
use ask_domain::GenerationParams;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default local model
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Default transport timeout (seconds); first loads of a model are slow
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Ollama API provider for local inference
#[derive(Debug)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    num_predict: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

impl From<&GenerationParams> for OllamaOptions {
    fn from(p: &GenerationParams) -> Self {
        Self {
            num_predict: p.max_new_tokens,
            // Ollama has no sampling switch; zero temperature is greedy
            temperature: if p.do_sample { p.temperature } else { 0.0 },
            top_p: p.top_p,
        }
    }
}

#[derive(Serialize)]
struct OllamaShowRequest<'a> {
    name: &'a str,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.2", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client: reqwest::Client::new(),
        }
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the transport timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured model
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check that the model is installed
    ///
    /// # Errors
    ///
    /// - `ModelNotAvailable` if Ollama does not know the model
    /// - `Communication` if Ollama is not running
    pub async fn ensure_available(&self) -> Result<(), LlmError> {
        let request = self
            .client
            .post(format!("{}/api/show", self.endpoint))
            .timeout(self.timeout)
            .json(&OllamaShowRequest { name: &self.model });

        send(request, &self.model).await.map(|_| ())
    }

    /// Load the model into memory
    ///
    /// An empty prompt makes Ollama load the model without generating.
    pub async fn warm_up(&self) -> Result<(), LlmError> {
        debug!("Warming up Ollama model '{}'", self.model);
        let request = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .timeout(self.timeout)
            .json(&OllamaGenerateRequest {
                model: &self.model,
                prompt: "",
                stream: false,
                options: None,
            });

        send(request, &self.model).await.map(|_| ())
    }
}

#[async_trait]
impl AnswerGenerator for OllamaProvider {
    type Error = LlmError;

    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Option<String>, Self::Error> {
        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: Some(params.into()),
        };

        let request = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .timeout(self.timeout)
            .json(&request_body);

        let raw = send(request, &self.model).await?;
        let text = parse_body(self.name(), &raw).and_then(|v| ollama_response(&v));
        if text.is_none() {
            warn!("Ollama response carried no text");
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama2");
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model(), "llama2");
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "mistral");
    }

    #[test]
    fn test_options_mapping() {
        let options = OllamaOptions::from(&GenerationParams::local());
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["num_predict"], 300);
        assert!((value["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);

        let mut greedy = GenerationParams::local();
        greedy.do_sample = false;
        assert_eq!(OllamaOptions::from(&greedy).temperature, 0.0);
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        // Use a closed port to trigger a transport error
        let provider = OllamaProvider::new("http://127.0.0.1:1", "llama2");

        let result = provider.generate("test", &GenerationParams::local()).await;
        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    // Integration test (requires running Ollama)
    #[tokio::test]
    #[ignore]
    async fn test_ollama_generate_integration() {
        let provider = OllamaProvider::default_endpoint(DEFAULT_MODEL);
        let result = provider
            .generate("Say 'hello' and nothing else", &GenerationParams::local())
            .await;
        if let Ok(Some(text)) = result {
            assert!(!text.is_empty());
        }
    }
}
