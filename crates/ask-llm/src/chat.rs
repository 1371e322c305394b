//! Chat-completion API provider
//!
//! Sends the prompt as a single user message to
//! `{endpoint}/chat/completions` and reads `choices[0].message.content`.

use crate::response::{chat_content, parse_body, send};
use crate::LlmError;
use ask_domain::traits::AnswerGenerator;
use ask_domain::GenerationParams;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Default API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "CHAT_COMPLETION_API_KEY";

/// Default transport timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Chat-completion API provider
pub struct ChatCompletionProvider {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl ChatCompletionProvider {
    /// Create a provider against the default endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client: reqwest::Client::new(),
        }
    }

    /// Point at any OpenAI-compatible base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
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

    fn request_body<'a>(&'a self, prompt: &'a str, params: &GenerationParams) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: params.temperature,
            max_tokens: params.max_new_tokens,
            top_p: params.top_p,
        }
    }
}

#[async_trait]
impl AnswerGenerator for ChatCompletionProvider {
    type Error = LlmError;

    fn name(&self) -> &str {
        "chat_completion"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Option<String>, Self::Error> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingCredential(API_KEY_ENV.to_string()));
        }

        info!("Calling chat-completion model '{}'", self.model);

        let request = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&self.request_body(prompt, params));

        let raw = send(request, &self.model).await?;
        let text = parse_body(self.name(), &raw).and_then(|v| chat_content(&v));
        if text.is_none() {
            warn!("Chat-completion response carried no message content");
        }
        Ok(text)
    }
}
