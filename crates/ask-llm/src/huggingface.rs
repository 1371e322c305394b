//! Hosted inference API provider
//!
//! Sends `{inputs, parameters}` to `{endpoint}/models/{model}` with a bearer
//! credential. The API answers with either an array of candidates or a
//! single object; both carry `generated_text`.
//!
//! # Examples
//!
//! ```no_run
//! use ask_llm::HuggingFaceProvider;
//!
//! let provider = HuggingFaceProvider::new("hf_xxx", "microsoft/DialoGPT-medium");
//! ```

use crate::response::{generated_text, parse_body, send};
use crate::LlmError;
use ask_domain::traits::AnswerGenerator;
use ask_domain::GenerationParams;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Default inference API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co";

/// Default model
pub const DEFAULT_MODEL: &str = "microsoft/DialoGPT-medium";

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "HUGGING_FACE_API_KEY";

/// Default transport timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Hosted inference API provider
pub struct HuggingFaceProvider {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    return_full_text: bool,
}

impl From<&GenerationParams> for InferenceParameters {
    fn from(p: &GenerationParams) -> Self {
        Self {
            max_new_tokens: p.max_new_tokens,
            temperature: p.temperature,
            do_sample: p.do_sample,
            top_p: p.top_p,
            return_full_text: p.return_full_text,
        }
    }
}

impl HuggingFaceProvider {
    /// Create a provider against the public endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client: reqwest::Client::new(),
        }
    }

    /// Point at a different endpoint (self-hosted inference, test server)
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

    fn url(&self) -> String {
        format!("{}/models/{}", self.endpoint, self.model)
    }
}

#[async_trait]
impl AnswerGenerator for HuggingFaceProvider {
    type Error = LlmError;

    fn name(&self) -> &str {
        "hugging_face"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Option<String>, Self::Error> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingCredential(API_KEY_ENV.to_string()));
        }

        info!("Calling inference API model '{}'", self.model);

        let body = InferenceRequest {
            inputs: prompt,
            parameters: params.into(),
        };

        let request = self
            .client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body);

        let raw = send(request, &self.model).await?;
        let text = parse_body(self.name(), &raw).and_then(|v| generated_text(&v));
        if text.is_none() {
            warn!("Inference API response carried no generated_text");
        }
        Ok(text)
    }
}
