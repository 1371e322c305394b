//! Ask Anything Storage Layer
//!
//! Implements the `KnowledgeStore` and `ConversationLog` traits.
//!
//! # Architecture
//!
//! - `SqliteStore`: SQLite with an FTS5 index over source content
//! - `SupabaseStore`: hosted Postgres through its PostgREST interface
//! - `StoreBackend`: one of the above, picked from `StoreConfig`
//!
//! Both backends accept the same websearch query syntax (see [`websearch`]).
//!
//! # Examples
//!
//! ```no_run
//! use ask_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for search and logging
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod sqlite;
pub mod supabase;
pub mod websearch;

use thiserror::Error;

pub use backend::{StoreBackend, StoreConfig, StoreKind};
pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Network error talking to the hosted store
    #[error("Communication error: {0}")]
    Communication(#[from] reqwest::Error),

    /// Hosted store answered with a non-success status
    #[error("Store returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Blocking store task panicked or was cancelled
    #[error("Store task failed: {0}")]
    Task(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Connection lock poisoned by a panicking thread
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Store credential or location is not configured
    #[error("Missing store configuration: {0} is not set")]
    MissingCredential(String),
}
