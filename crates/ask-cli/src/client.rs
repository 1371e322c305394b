//! HTTP client for a running Ask Anything server.

use crate::error::{CliError, Result};
use ask_core::{AskRequest, AskResponse};
use serde::Deserialize;
use std::time::Duration;

/// Health report from the server
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReport {
    /// Overall status
    pub status: String,
    /// Server version
    pub version: String,
    /// Active generation backend
    pub generator: String,
    /// Active storage backend
    pub store: String,
    /// Local pipeline state, if any
    #[serde(default)]
    pub pipeline: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the question endpoint
#[derive(Clone)]
pub struct AskClient {
    http_client: reqwest::Client,
    server_url: String,
    timeout: Duration,
}

impl AskClient {
    /// Create a client for a server base URL
    pub fn new(server_url: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Server base URL
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// POST /ask-anything
    pub async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
        let url = format!("{}/ask-anything", self.server_url);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await?;

        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthReport> {
        let url = format!("{}/health", self.server_url);

        let response = self
            .http_client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;

        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        Err(CliError::Server {
            status: status.as_u16(),
            message,
        })
    }
}
