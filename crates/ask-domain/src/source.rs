//! Knowledge sources - the documents an answer may cite

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identifier of a knowledge source
///
/// Stores hand back either integer or string keys; both normalise to the
/// same string-backed identifier so callers never depend on the key type.
///
/// # Examples
///
/// ```
/// use ask_domain::SourceId;
///
/// let from_int: SourceId = serde_json::from_str("7").unwrap();
/// let from_str: SourceId = serde_json::from_str("\"7\"").unwrap();
/// assert_eq!(from_int, from_str);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Create a SourceId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for SourceId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

struct SourceIdVisitor;

impl<'de> Visitor<'de> for SourceIdVisitor {
    type Value = SourceId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(SourceId::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(SourceId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(SourceId(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(SourceId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for SourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SourceIdVisitor)
    }
}

/// A stored document eligible to be cited as supporting context
///
/// Immutable from the orchestrator's point of view; content management
/// happens outside this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSource {
    /// Store-assigned identifier
    pub id: SourceId,

    /// Human-readable title, shown in citations
    pub title: String,

    /// Where the document lives, if it has a public location
    #[serde(default)]
    pub url: Option<String>,

    /// Full text injected into the generation context
    pub content: String,
}

impl KnowledgeSource {
    /// Create a new source
    pub fn new(
        id: impl Into<SourceId>,
        title: impl Into<String>,
        url: Option<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url,
            content: content.into(),
        }
    }

    /// Render this source as a context block
    ///
    /// A missing URL renders as an empty pair of parentheses so every
    /// block keeps the same shape.
    pub fn context_block(&self) -> String {
        format!(
            "Source: {} ({})\nContent: {}",
            self.title,
            self.url.as_deref().unwrap_or(""),
            self.content
        )
    }
}
