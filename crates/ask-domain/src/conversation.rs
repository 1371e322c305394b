//! Conversation log records and session identifiers

use crate::source::{KnowledgeSource, SourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque session token grouping conversation records
///
/// Callers may supply their own; otherwise a UUIDv7 string is generated.
/// No uniqueness or expiry is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh UUIDv7-based session id
    ///
    /// # Examples
    ///
    /// ```
    /// use ask_domain::SessionId;
    ///
    /// let a = SessionId::generate();
    /// let b = SessionId::generate();
    /// assert_ne!(a, b);
    /// ```
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Wrap a caller-supplied token
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Use the caller's token if present and non-blank, else generate one
    pub fn or_generate(supplied: Option<&str>) -> Self {
        match supplied.map(str::trim) {
            Some(s) if !s.is_empty() => Self::new(s),
            _ => Self::generate(),
        }
    }

    /// Borrow as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One answered question, appended to the conversation log
///
/// Created exactly once per answered question; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// The question as asked
    pub question: String,

    /// The answer returned to the caller
    pub answer: String,

    /// Ids of the sources that were in context, in search order
    pub source_ids: Vec<SourceId>,

    /// Session this exchange belongs to
    pub session_id: Option<SessionId>,
}

impl ConversationRecord {
    /// Build a record from the sources that were matched for the question
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        sources: &[KnowledgeSource],
        session_id: Option<SessionId>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            source_ids: sources.iter().map(|s| s.id.clone()).collect(),
            session_id,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a non-blank supplied token always survives, trimmed
        #[test]
        fn test_supplied_session_passes_through(token in "[A-Za-z0-9-]{1,40}", pad in " {0,3}") {
            let supplied = format!("{}{}{}", pad, token, pad);
            let id = SessionId::or_generate(Some(&supplied));
            prop_assert_eq!(id.as_str(), token.as_str());
        }

        /// Property: record source ids mirror the matched sources one to one
        #[test]
        fn test_record_ids_mirror_sources(ids in proptest::collection::vec("[a-z0-9]{1,8}", 0..10)) {
            let sources: Vec<KnowledgeSource> = ids
                .iter()
                .map(|id| KnowledgeSource::new(id.as_str(), "t", None, "c"))
                .collect();
            let record = ConversationRecord::new("q", "a", &sources, None);
            let expected: Vec<SourceId> = ids.iter().map(|id| SourceId::new(id.as_str())).collect();
            prop_assert_eq!(record.source_ids, expected);
        }
    }
}
