//! Shared HTTP handling and response normalisation for the backends

use crate::LlmError;
use serde_json::Value;
use tracing::{debug, warn};

/// Longest error body kept in `LlmError::Status`
const MAX_ERROR_BODY: usize = 512;

/// Send a prepared request and return the body of a successful response
///
/// Non-success statuses become errors; the body is returned as raw text so
/// each backend can decide how lenient to be about its shape.
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    model: &str,
) -> Result<String, LlmError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        debug!("Backend response: {} bytes", body.len());
        return Ok(body);
    }

    match status {
        reqwest::StatusCode::NOT_FOUND => Err(LlmError::ModelNotAvailable(model.to_string())),
        reqwest::StatusCode::TOO_MANY_REQUESTS => Err(LlmError::RateLimitExceeded),
        _ => {
            let mut body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            Err(LlmError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Parse a body as JSON; a non-JSON body is a malformed response, not an error
pub(crate) fn parse_body(backend: &str, body: &str) -> Option<Value> {
    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} returned a non-JSON body: {}", backend, e);
            None
        }
    }
}

/// `[{generated_text}, ...]` or `{generated_text}`: first candidate's text
pub(crate) fn generated_text(value: &Value) -> Option<String> {
    let candidate = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    non_empty(candidate.get("generated_text")?.as_str()?)
}

/// `{choices: [{message: {content}}]}`: first choice's content
pub(crate) fn chat_content(value: &Value) -> Option<String> {
    let content = value
        .get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()?;
    non_empty(content)
}

/// `{response}`: Ollama's generate output
pub(crate) fn ollama_response(value: &Value) -> Option<String> {
    non_empty(value.get("response")?.as_str()?)
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
