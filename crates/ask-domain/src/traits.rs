//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the orchestration logic and
//! infrastructure. Implementations live in other crates.

use crate::{ConversationRecord, GenerationParams, KnowledgeSource};
use async_trait::async_trait;

/// Full-text searchable table of knowledge sources
///
/// Implemented by the infrastructure layer (ask-store)
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Error type for store operations
    type Error: std::fmt::Display + Send;

    /// Search `content` with a websearch-style query
    ///
    /// Returns every matching row; an empty vector when nothing matches.
    async fn search(&self, query: &str) -> Result<Vec<KnowledgeSource>, Self::Error>;
}

/// Append-only log of answered questions
///
/// Implemented by the infrastructure layer (ask-store)
#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// Error type for log operations
    type Error: std::fmt::Display + Send;

    /// Append one record
    async fn append(&self, record: &ConversationRecord) -> Result<(), Self::Error>;
}

/// Text generation backend
///
/// Implemented by the infrastructure layer (ask-llm)
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Error type for generation operations
    type Error: std::fmt::Display + Send;

    /// Short backend name for logs and health output
    fn name(&self) -> &str;

    /// Generate text for a prompt
    ///
    /// `Ok(None)` means the backend answered but its response carried no
    /// usable text (unexpected shape, missing or empty field). Transport
    /// and status failures are errors.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Option<String>, Self::Error>;
}
