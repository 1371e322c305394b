//! Request and response types for the Orchestrator

use ask_domain::{KnowledgeSource, SessionId};
use serde::{Deserialize, Serialize};

/// A question to answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    /// The question; empty or absent is rejected
    #[serde(default)]
    pub question: String,

    /// Caller-supplied session token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AskRequest {
    /// Create a request without a session
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            session_id: None,
        }
    }

    /// Attach a session token
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// An answered question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    /// Generated answer, or the configured fallback
    pub answer: String,

    /// Every source that was in context, as the store returned it
    pub sources: Vec<KnowledgeSource>,

    /// Effective session id
    pub session_id: SessionId,
}
