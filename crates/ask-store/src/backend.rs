//! Configuration-selected storage backend

use crate::supabase::{KEY_ENV, URL_ENV};
use crate::{SqliteStore, StoreError, SupabaseStore};
use ask_domain::traits::{ConversationLog, KnowledgeStore};
use ask_domain::{ConversationRecord, KnowledgeSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Which storage backend to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Local SQLite file
    #[default]
    Sqlite,
    /// Hosted Postgres project
    Supabase,
}

/// Store configuration, usually the `[store]` table of a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend to use
    #[serde(default)]
    pub backend: StoreKind,

    /// Database file for the SQLite backend
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Project URL override for the hosted backend; read from the environment when unset
    #[serde(default)]
    pub url: Option<String>,

    /// Request timeout in seconds for the hosted backend
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_path() -> PathBuf {
    PathBuf::from("knowledge.db")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreKind::default(),
            path: default_path(),
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One of the available storage backends
///
/// Serves as both the knowledge store and the conversation log.
pub enum StoreBackend {
    /// Local SQLite file
    Sqlite(SqliteStore),
    /// Hosted Postgres project
    Supabase(SupabaseStore),
}

impl StoreBackend {
    /// Open the configured backend, reading credentials from the environment
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::from_config_with(config, |key| std::env::var(key).ok())
    }

    /// Open the configured backend with an explicit credential lookup
    ///
    /// # Errors
    ///
    /// `MissingCredential` when the hosted backend has no URL or key.
    pub fn from_config_with<F>(config: &StoreConfig, lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match config.backend {
            StoreKind::Sqlite => StoreBackend::Sqlite(SqliteStore::new(&config.path)?),
            StoreKind::Supabase => {
                let url = match config.url.clone().or_else(|| present(URL_ENV)) {
                    Some(url) => url,
                    None => return Err(StoreError::MissingCredential(URL_ENV.to_string())),
                };
                let key = present(KEY_ENV)
                    .ok_or_else(|| StoreError::MissingCredential(KEY_ENV.to_string()))?;
                StoreBackend::Supabase(
                    SupabaseStore::new(url, key)
                        .with_timeout(Duration::from_secs(config.timeout_secs)),
                )
            }
        };

        info!("Store backend: {}", backend.name());
        Ok(backend)
    }

    /// Short backend name for status reporting
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite(_) => "sqlite",
            StoreBackend::Supabase(_) => "supabase",
        }
    }
}

#[async_trait]
impl KnowledgeStore for StoreBackend {
    type Error = StoreError;

    async fn search(&self, query: &str) -> Result<Vec<KnowledgeSource>, Self::Error> {
        match self {
            StoreBackend::Sqlite(s) => s.search(query).await,
            StoreBackend::Supabase(s) => s.search(query).await,
        }
    }
}

#[async_trait]
impl ConversationLog for StoreBackend {
    type Error = StoreError;

    async fn append(&self, record: &ConversationRecord) -> Result<(), Self::Error> {
        match self {
            StoreBackend::Sqlite(s) => s.append(record).await,
            StoreBackend::Supabase(s) => s.append(record).await,
        }
    }
}
