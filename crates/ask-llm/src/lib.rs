//! Ask Anything Generation Backends
//!
//! Implementations of the `AnswerGenerator` trait from `ask-domain`.
//! Every backend takes the same prompt and `GenerationParams` and normalises
//! its own response shape to `Option<String>`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `HuggingFaceProvider`: Hosted inference API (`{inputs, parameters}`)
//! - `ChatCompletionProvider`: Chat-completion API (`{model, messages, ...}`)
//! - `OllamaProvider`: Local Ollama API
//! - `LazyPipeline`: Lazily loaded local pipeline with shared initialisation
//!
//! `GeneratorBackend` picks one of these from a `GeneratorConfig`.
//!
//! # Examples
//!
//! ```
//! use ask_llm::MockProvider;
//! use ask_domain::traits::AnswerGenerator;
//! use ask_domain::GenerationParams;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt", &GenerationParams::default()).await.unwrap();
//! assert_eq!(result.as_deref(), Some("Hello from LLM!"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod chat;
pub mod config;
pub mod huggingface;
pub mod lazy;
pub mod ollama;
mod response;

use ask_domain::traits::AnswerGenerator;
use ask_domain::GenerationParams;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

pub use backend::GeneratorBackend;
pub use chat::ChatCompletionProvider;
pub use config::{BackendKind, GeneratorConfig};
pub use huggingface::HuggingFaceProvider;
pub use lazy::{LazyPipeline, OllamaLoader, PipelineLoader, PipelineStatus};
pub use ollama::OllamaProvider;

/// Errors that can occur during generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Credential for the active backend is not configured
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    /// Local pipeline could not be constructed
    #[error("Pipeline failed to load: {0}")]
    PipelineLoad(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Communication(e.to_string())
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Empty,
    Fail,
}

/// Mock generation provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Records every prompt it sees so tests can inspect what was sent.
///
/// # Examples
///
/// ```
/// use ask_llm::MockProvider;
/// use ask_domain::traits::AnswerGenerator;
/// use ask_domain::GenerationParams;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let params = GenerationParams::default();
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.generate("prompt1", &params).await.unwrap().as_deref(), Some("response1"));
///
/// let provider = MockProvider::failing();
/// assert!(provider.generate("anything", &params).await.is_err());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(MockReply::Text(response.into()))
    }

    /// A provider whose every call fails
    pub fn failing() -> Self {
        Self::with_default(MockReply::Fail)
    }

    /// A provider whose every call returns no usable text
    pub fn malformed() -> Self {
        Self::with_default(MockReply::Empty)
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt.into(), MockReply::Fail);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    /// The most recent prompt received, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl AnswerGenerator for MockProvider {
    type Error = LlmError;

    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<Option<String>, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let reply = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Text(text) => Ok(Some(text)),
            MockReply::Empty => Ok(None),
            MockReply::Fail => Err(LlmError::Other("Mock error".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerationParams {
        GenerationParams::default()
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt", &params()).await;
        assert_eq!(result.unwrap().as_deref(), Some("Test response"));
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello", &params()).await.unwrap().as_deref(), Some("world"));
        assert_eq!(provider.generate("foo", &params()).await.unwrap().as_deref(), Some("bar"));
        assert_eq!(
            provider.generate("unknown", &params()).await.unwrap().as_deref(),
            Some("Default mock response")
        );
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1", &params()).await.unwrap();
        provider.generate("prompt2", &params()).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.last_prompt().as_deref(), Some("prompt2"));

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate("bad prompt", &params()).await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_malformed() {
        let provider = MockProvider::malformed();
        assert_eq!(provider.generate("x", &params()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test", &params()).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
