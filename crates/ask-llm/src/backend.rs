//! Configuration-selected generation backend

use crate::config::{BackendKind, GeneratorConfig};
use crate::lazy::{LazyPipeline, OllamaLoader};
use crate::{
    chat, huggingface, ollama, ChatCompletionProvider, HuggingFaceProvider, LlmError,
    MockProvider, OllamaProvider,
};
use ask_domain::traits::AnswerGenerator;
use ask_domain::GenerationParams;
use async_trait::async_trait;
use tracing::info;

/// One of the available generation backends
///
/// Lets the orchestrator stay generic over a single concrete type while the
/// actual backend is picked at startup from configuration.
pub enum GeneratorBackend {
    /// Hosted inference API
    HuggingFace(HuggingFaceProvider),
    /// Chat-completion API
    ChatCompletion(ChatCompletionProvider),
    /// Ollama server, called directly
    Ollama(OllamaProvider),
    /// Lazily loaded local pipeline
    Local(LazyPipeline<OllamaLoader>),
    /// Deterministic mock
    Mock(MockProvider),
}

impl GeneratorBackend {
    /// Build the configured backend, reading credentials from the environment
    ///
    /// # Errors
    ///
    /// `MissingCredential` if the active backend needs a credential that is
    /// not set.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, LlmError> {
        Self::from_config_with(config, |key| std::env::var(key).ok())
    }

    /// Build the configured backend with an explicit credential lookup
    pub fn from_config_with<F>(config: &GeneratorConfig, lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = match config.credential_env() {
            Some(env) => match lookup(&env).filter(|v| !v.trim().is_empty()) {
                Some(key) => Some(key),
                None => return Err(LlmError::MissingCredential(env)),
            },
            None => None,
        };
        let api_key = credential.unwrap_or_default();
        let timeout = config.timeout();

        let backend = match config.backend {
            BackendKind::HuggingFace => {
                let model = config.model.as_deref().unwrap_or(huggingface::DEFAULT_MODEL);
                let mut provider = HuggingFaceProvider::new(api_key, model).with_timeout(timeout);
                if let Some(endpoint) = &config.endpoint {
                    provider = provider.with_endpoint(endpoint);
                }
                GeneratorBackend::HuggingFace(provider)
            }
            BackendKind::ChatCompletion => {
                let model = config.model.as_deref().unwrap_or(chat::DEFAULT_MODEL);
                let mut provider = ChatCompletionProvider::new(api_key, model).with_timeout(timeout);
                if let Some(endpoint) = &config.endpoint {
                    provider = provider.with_endpoint(endpoint);
                }
                GeneratorBackend::ChatCompletion(provider)
            }
            BackendKind::Ollama => {
                let endpoint = config.endpoint.as_deref().unwrap_or(ollama::DEFAULT_ENDPOINT);
                let model = config.model.as_deref().unwrap_or(ollama::DEFAULT_MODEL);
                GeneratorBackend::Ollama(OllamaProvider::new(endpoint, model).with_timeout(timeout))
            }
            BackendKind::Local => {
                let endpoint = config.endpoint.as_deref().unwrap_or(ollama::DEFAULT_ENDPOINT);
                let model = config.model.as_deref().unwrap_or(ollama::DEFAULT_MODEL);
                let loader = OllamaLoader::new(endpoint, model).with_timeout(timeout);
                GeneratorBackend::Local(LazyPipeline::new(loader))
            }
        };

        info!("Generation backend: {}", backend.name());
        Ok(backend)
    }

    /// The lazily loaded pipeline, when this is the local backend
    pub fn as_local(&self) -> Option<&LazyPipeline<OllamaLoader>> {
        match self {
            GeneratorBackend::Local(pipeline) => Some(pipeline),
            _ => None,
        }
    }
}

#[async_trait]
impl AnswerGenerator for GeneratorBackend {
    type Error = LlmError;

    fn name(&self) -> &str {
        match self {
            GeneratorBackend::HuggingFace(p) => p.name(),
            GeneratorBackend::ChatCompletion(p) => p.name(),
            GeneratorBackend::Ollama(p) => p.name(),
            GeneratorBackend::Local(p) => p.name(),
            GeneratorBackend::Mock(p) => p.name(),
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Option<String>, Self::Error> {
        match self {
            GeneratorBackend::HuggingFace(p) => p.generate(prompt, params).await,
            GeneratorBackend::ChatCompletion(p) => p.generate(prompt, params).await,
            GeneratorBackend::Ollama(p) => p.generate(prompt, params).await,
            GeneratorBackend::Local(p) => p.generate(prompt, params).await,
            GeneratorBackend::Mock(p) => p.generate(prompt, params).await,
        }
    }
}
