//! Ask Anything Orchestrator
//!
//! Answers a question from the knowledge store through an answer generator
//! and records the exchange.
//!
//! # Architecture
//!
//! ```text
//! Question → KnowledgeStore → PromptBuilder → AnswerGenerator → ConversationLog
//! ```
//!
//! # Failure Policy
//!
//! - **Empty question**: rejected before any external call
//! - **Store search fails**: logged, answered without context
//! - **Generator fails**: the request fails and nothing is logged
//! - **Generator returns no text**: the configured fallback answer is used
//! - **Log append fails**: logged, the answer is still returned
//!
//! # Example Usage
//!
//! ```no_run
//! use ask_core::{AskRequest, Orchestrator, OrchestratorConfig};
//! use ask_llm::MockProvider;
//! use ask_store::SqliteStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::in_memory()?);
//! let generator = Arc::new(MockProvider::new("They offer three services."));
//!
//! let orchestrator = Orchestrator::new(store.clone(), generator, store, OrchestratorConfig::default());
//!
//! let response = orchestrator.handle(AskRequest::new("What services does Re:cinq offer?")).await?;
//! println!("{} ({} sources)", response.answer, response.sources.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;
mod prompt;
mod types;


pub use config::{
    OrchestratorConfig, DEFAULT_ANSWER_CUE, DEFAULT_FALLBACK_ANSWER, DEFAULT_PREAMBLE,
    LOCAL_ANSWER_CUE, LOCAL_PREAMBLE,
};
pub use error::{AskError, ConfigError};
pub use orchestrator::Orchestrator;
pub use prompt::PromptBuilder;
pub use types::{AskRequest, AskResponse};
