//! SQLite-backed knowledge store and conversation log

use crate::websearch::to_fts5;
use crate::StoreError;
use ask_domain::traits::{ConversationLog, KnowledgeStore};
use ask_domain::{ConversationRecord, KnowledgeSource, SessionId, SourceId};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// SQLite-based implementation of KnowledgeStore and ConversationLog
///
/// Sources live in `knowledge_sources` with an FTS5 index (porter stemming)
/// over `content`; conversations are appended to `conversations`.
///
/// # Thread Safety
///
/// The connection sits behind a shared mutex. Clones share the connection.
/// The async trait methods run their queries on tokio's blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ask_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("knowledge.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert a source, or replace the one with the same id
    pub fn upsert_source(&self, source: &KnowledgeSource) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO knowledge_sources (id, title, url, content)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                url = excluded.url,
                content = excluded.content",
            params![source.id.as_str(), &source.title, &source.url, &source.content],
        )?;
        Ok(())
    }

    /// Remove a source; returns whether it existed
    pub fn remove_source(&self, id: &SourceId) -> Result<bool, StoreError> {
        let removed = self
            .conn()?
            .execute("DELETE FROM knowledge_sources WHERE id = ?1", params![id.as_str()])?;
        Ok(removed > 0)
    }

    /// Number of stored sources
    pub fn source_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM knowledge_sources", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Run a websearch query synchronously
    pub fn search_sync(&self, query: &str) -> Result<Vec<KnowledgeSource>, StoreError> {
        let Some(expr) = to_fts5(query) else {
            debug!("Query has no searchable terms: {:?}", query);
            return Ok(Vec::new());
        };
        debug!("FTS5 expression: {}", expr);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT s.id, s.title, s.url, s.content
             FROM knowledge_sources_fts
             JOIN knowledge_sources s ON s.pk = knowledge_sources_fts.rowid
             WHERE knowledge_sources_fts MATCH ?1
             ORDER BY knowledge_sources_fts.rank",
        )?;

        let rows = stmt.query_map(params![expr], |row| {
            Ok(KnowledgeSource {
                id: SourceId::new(row.get::<_, String>(0)?),
                title: row.get(1)?,
                url: row.get(2)?,
                content: row.get(3)?,
            })
        })?;

        let mut sources = Vec::new();
        for row in rows {
            sources.push(row?);
        }
        Ok(sources)
    }

    /// Conversation records in insertion order, optionally for one session
    pub fn conversations(
        &self,
        session: Option<&SessionId>,
    ) -> Result<Vec<ConversationRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT question, answer, sources_used, session_id
             FROM conversations
             WHERE ?1 IS NULL OR session_id = ?1
             ORDER BY id",
        )?;

        let rows = stmt.query_map(params![session.map(SessionId::as_str)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (question, answer, sources_used, session_id) = row?;
            records.push(ConversationRecord {
                question,
                answer,
                source_ids: serde_json::from_str(&sources_used)?,
                session_id: session_id.map(SessionId::new),
            });
        }
        Ok(records)
    }

    /// Append a conversation record synchronously
    pub fn append_sync(&self, record: &ConversationRecord) -> Result<(), StoreError> {
        let sources_used = serde_json::to_string(&record.source_ids)?;
        self.conn()?.execute(
            "INSERT INTO conversations (question, answer, sources_used, session_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                &record.question,
                &record.answer,
                sources_used,
                record.session_id.as_ref().map(SessionId::as_str),
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for SqliteStore {
    type Error = StoreError;

    async fn search(&self, query: &str) -> Result<Vec<KnowledgeSource>, Self::Error> {
        let store = self.clone();
        let query = query.to_string();

        tokio::task::spawn_blocking(move || store.search_sync(&query))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl ConversationLog for SqliteStore {
    type Error = StoreError;

    async fn append(&self, record: &ConversationRecord) -> Result<(), Self::Error> {
        let store = self.clone();
        let record = record.clone();

        tokio::task::spawn_blocking(move || store.append_sync(&record))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn source(id: &str, title: &str, content: &str) -> KnowledgeSource {
        KnowledgeSource::new(id, title, Some(format!("https://example.com/{}", id)), content)
    }

    #[test]
    fn test_store_initialization() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.source_count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_replaces_and_reindexes() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_source(&source("1", "Old", "legacy mainframes")).unwrap();
        store.upsert_source(&source("1", "New", "kubernetes platforms")).unwrap();

        assert_eq!(store.source_count().unwrap(), 1);
        assert!(store.search_sync("mainframes").unwrap().is_empty());

        let hits = store.search_sync("kubernetes").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "New");
    }

    #[test]
    fn test_remove_source() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_source(&source("1", "T", "observability")).unwrap();

        assert!(store.remove_source(&SourceId::new("1")).unwrap());
        assert!(!store.remove_source(&SourceId::new("1")).unwrap());
        assert!(store.search_sync("observability").unwrap().is_empty());
    }

    #[test]
    fn test_search_uses_stemming() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_source(&source("1", "Services", "We offer consulting services")).unwrap();

        let hits = store.search_sync("service offering").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_stop_word_query_returns_nothing() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_source(&source("1", "T", "what is the answer")).unwrap();
        assert!(store.search_sync("what is the").unwrap().is_empty());
    }

    #[test]
    fn test_append_and_read_conversations() {
        let store = SqliteStore::in_memory().unwrap();
        let session = SessionId::new("s1");
        let sources = vec![source("1", "A", "x"), source("2", "B", "y")];

        store
            .append_sync(&ConversationRecord::new("q1", "a1", &sources, Some(session.clone())))
            .unwrap();
        store
            .append_sync(&ConversationRecord::new("q2", "a2", &[], None))
            .unwrap();

        let all = store.conversations(None).unwrap();
        assert_eq!(all.len(), 2);

        let mine = store.conversations(Some(&session)).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].source_ids, vec![SourceId::new("1"), SourceId::new("2")]);
        assert_eq!(mine[0].session_id, Some(session));
    }

    #[test]
    fn test_possessive_question_finds_source() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .upsert_source(&source("1", "Podcast", "Re:cinq hosts the Waves of Innovation podcast"))
            .unwrap();

        assert_eq!(store.search_sync("Re:cinq podcast").unwrap().len(), 1);
        assert_eq!(store.search_sync("What's Re:cinq's podcast?").unwrap().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_search_waits_for_lock_off_the_runtime() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_source(&source("1", "Podcast", "Waves of Innovation podcast")).unwrap();

        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let holder = {
            let store = store.clone();
            std::thread::spawn(move || {
                let _conn = store.conn().unwrap();
                locked_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
        };
        locked_rx.recv().unwrap();

        let search = {
            let store = store.clone();
            tokio::spawn(async move { KnowledgeStore::search(&store, "podcast").await })
        };

        // The single runtime thread must stay free while the search waits.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!search.is_finished());

        release_tx.send(()).unwrap();
        let hits = search.await.unwrap().unwrap();
        assert_eq!(hits.len(), 1);
        holder.join().unwrap();
    }

    #[tokio::test]
    async fn test_async_append_is_visible_to_clones() {
        let store = SqliteStore::in_memory().unwrap();
        let other = store.clone();

        ConversationLog::append(&store, &ConversationRecord::new("q", "a", &[], None))
            .await
            .unwrap();

        assert_eq!(other.conversations(None).unwrap().len(), 1);
    }
}
