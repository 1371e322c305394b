//! Hosted store reached through its PostgREST interface

use crate::StoreError;
use ask_domain::traits::{ConversationLog, KnowledgeStore};
use ask_domain::{ConversationRecord, KnowledgeSource};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the project URL
pub const URL_ENV: &str = "SUPABASE_URL";

/// Environment variable holding the service-role key
pub const KEY_ENV: &str = "SUPABASE_SERVICE_ROLE_KEY";

const SOURCES_TABLE: &str = "knowledge_sources";
const CONVERSATIONS_TABLE: &str = "conversations";

/// Knowledge store and conversation log backed by a hosted Postgres project
///
/// Search uses the `websearch` full-text operator on `content`, so query
/// syntax matches [`crate::websearch`].
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    url: String,
    key: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct ConversationRow<'a> {
    question: &'a str,
    answer: &'a str,
    sources_used: Vec<&'a str>,
    session_id: Option<&'a str>,
}

impl SupabaseStore {
    /// Create a store for a project URL and service-role key
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into().trim_end_matches('/').to_string(),
            key: key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .timeout(self.timeout)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl KnowledgeStore for SupabaseStore {
    type Error = StoreError;

    async fn search(&self, query: &str) -> Result<Vec<KnowledgeSource>, Self::Error> {
        let filter = format!("wfts.{}", query);
        debug!("Searching {} with {}", SOURCES_TABLE, filter);

        let request = self
            .client
            .get(self.table_url(SOURCES_TABLE))
            .query(&[("select", "*"), ("content", filter.as_str())]);
        let response = Self::check(self.authorize(request).send().await?).await?;

        let sources: Vec<KnowledgeSource> = response.json().await?;
        Ok(sources)
    }
}

#[async_trait]
impl ConversationLog for SupabaseStore {
    type Error = StoreError;

    async fn append(&self, record: &ConversationRecord) -> Result<(), Self::Error> {
        let row = ConversationRow {
            question: &record.question,
            answer: &record.answer,
            sources_used: record.source_ids.iter().map(|id| id.as_str()).collect(),
            session_id: record.session_id.as_ref().map(|s| s.as_str()),
        };

        let request = self
            .client
            .post(self.table_url(CONVERSATIONS_TABLE))
            .header("Prefer", "return=minimal")
            .json(&row);
        let response = self.authorize(request).send().await?;
        if let Err(e) = Self::check(response).await {
            warn!("Conversation insert rejected: {}", e);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ask_domain::{SessionId, SourceId};

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let store = SupabaseStore::new("https://project.supabase.co/", "key");
        assert_eq!(
            store.table_url(SOURCES_TABLE),
            "https://project.supabase.co/rest/v1/knowledge_sources"
        );
    }

    #[test]
    fn test_conversation_row_shape() {
        let record = ConversationRecord {
            question: "q".to_string(),
            answer: "a".to_string(),
            source_ids: vec![SourceId::new("1"), SourceId::new("7")],
            session_id: Some(SessionId::new("s")),
        };
        let row = ConversationRow {
            question: &record.question,
            answer: &record.answer,
            sources_used: record.source_ids.iter().map(|id| id.as_str()).collect(),
            session_id: record.session_id.as_ref().map(|s| s.as_str()),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "question": "q",
                "answer": "a",
                "sources_used": ["1", "7"],
                "session_id": "s"
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_store_is_communication_error() {
        let store = SupabaseStore::new("http://127.0.0.1:1", "key")
            .with_timeout(Duration::from_millis(500));
        let result = store.search("cloud").await;
        assert!(matches!(result, Err(StoreError::Communication(_))));
    }
}
