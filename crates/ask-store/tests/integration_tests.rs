//! Integration tests for ask-store
//!
//! These tests go through the trait interfaces the orchestrator uses.

use ask_domain::traits::{ConversationLog, KnowledgeStore};
use ask_domain::{ConversationRecord, KnowledgeSource, SessionId};
use ask_store::{SqliteStore, StoreBackend, StoreConfig};

fn seeded_store() -> SqliteStore {
    let store = SqliteStore::in_memory().unwrap();
    let sources = [
        KnowledgeSource::new(
            "1",
            "Services",
            Some("https://re-cinq.com/services".to_string()),
            "Re:cinq offers cloud native consulting and platform engineering.",
        ),
        KnowledgeSource::new(
            "2",
            "Podcast",
            Some("https://re-cinq.com/podcast".to_string()),
            "Waves of Innovation is a podcast about AI and sustainability.",
        ),
        KnowledgeSource::new(
            "3",
            "Green IT",
            None,
            "Sustainable cloud infrastructure reduces carbon emissions.",
        ),
    ];
    for source in &sources {
        store.upsert_source(source).unwrap();
    }
    store
}

#[tokio::test]
async fn test_search_matches_all_terms() {
    let store = seeded_store();

    let hits = store.search("cloud consulting").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Services");
}

#[tokio::test]
async fn test_search_or_and_exclusion() {
    let store = seeded_store();

    let mut ids: Vec<String> = store
        .search("podcast or cloud")
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id.to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["1", "2", "3"]);

    let hits = store.search("cloud -carbon").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id.as_str(), "1");
}

#[tokio::test]
async fn test_search_phrase() {
    let store = seeded_store();

    let hits = store.search("\"waves of innovation\"").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, Some("https://re-cinq.com/podcast".to_string()));

    assert!(store.search("\"innovation of waves\"").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_without_match_is_empty() {
    let store = seeded_store();
    assert!(store.search("quantum blockchain").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_log_appends_in_order() {
    let store = seeded_store();
    let session = SessionId::generate();
    let sources = store.search("podcast").await.unwrap();

    store
        .append(&ConversationRecord::new("first", "a1", &sources, Some(session.clone())))
        .await
        .unwrap();
    store
        .append(&ConversationRecord::new("second", "a2", &[], Some(session.clone())))
        .await
        .unwrap();

    let records = store.conversations(Some(&session)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].question, "first");
    assert_eq!(records[0].source_ids.len(), 1);
    assert_eq!(records[1].question, "second");
    assert!(records[1].source_ids.is_empty());
}

#[tokio::test]
async fn test_backend_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        path: dir.path().join("knowledge.db"),
        ..StoreConfig::default()
    };

    {
        let backend = StoreBackend::from_config_with(&config, |_| None).unwrap();
        let StoreBackend::Sqlite(store) = &backend else {
            panic!("expected sqlite backend");
        };
        store
            .upsert_source(&KnowledgeSource::new("k", "Kept", None, "persistent content"))
            .unwrap();
    }

    let backend = StoreBackend::from_config_with(&config, |_| None).unwrap();
    let hits = backend.search("persistent").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Kept");
}
