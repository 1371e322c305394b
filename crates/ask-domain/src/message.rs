//! UI-local chat messages

use crate::source::{KnowledgeSource, SourceId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier of a chat message (UUIDv7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(uuid::Uuid);

impl MessageId {
    /// Generate a new time-ordered id
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Citation shown under an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source id
    pub id: SourceId,
    /// Source title
    pub title: String,
    /// Source URL, if any
    pub url: Option<String>,
}

impl From<&KnowledgeSource> for SourceRef {
    fn from(source: &KnowledgeSource) -> Self {
        Self {
            id: source.id.clone(),
            title: source.title.clone(),
            url: source.url.clone(),
        }
    }
}

/// A question/answer/sources triple held in the chat history
///
/// Transient: lives only in memory for the lifetime of a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message id
    pub id: MessageId,
    /// The question as submitted (trimmed)
    pub question: String,
    /// The answer returned
    pub answer: String,
    /// Citations
    pub sources: Vec<SourceRef>,
    /// Creation time (milliseconds since Unix epoch)
    pub timestamp: u64,
}

impl Message {
    /// Create a message stamped with the current time
    pub fn new(question: impl Into<String>, answer: impl Into<String>, sources: &[KnowledgeSource]) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            id: MessageId::new(),
            question: question.into(),
            answer: answer.into(),
            sources: sources.iter().map(SourceRef::from).collect(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_drops_content_from_citations() {
        let sources = vec![KnowledgeSource::new(
            "1",
            "Services",
            Some("https://x".to_string()),
            "long body",
        )];
        let msg = Message::new("q", "a", &sources);
        assert_eq!(msg.sources.len(), 1);
        assert_eq!(msg.sources[0].title, "Services");
        assert_eq!(msg.sources[0].url.as_deref(), Some("https://x"));
        assert!(msg.timestamp > 0);
    }

    #[test]
    fn test_message_ids_are_ordered() {
        let a = MessageId::new();
        let b = MessageId::new();
        assert!(a <= b);
    }
}
