//! Ask Anything Domain Layer
//!
//! Core types and trait interfaces for the question-answering service.
//! Infrastructure (stores, generation backends, HTTP) lives in other crates
//! and depends on the definitions here.
//!
//! ## Key Concepts
//!
//! - **KnowledgeSource**: a stored document eligible to be cited for an answer
//! - **ConversationRecord**: one answered question, appended to the log
//! - **SessionId**: opaque token grouping conversation records
//! - **Message**: a UI-local question/answer/sources triple
//!
//! ## Architecture
//!
//! - Pure data types and trait definitions
//! - No I/O in this crate
//! - Trait definitions for every external collaborator

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conversation;
pub mod message;
pub mod params;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use conversation::{ConversationRecord, SessionId};
pub use message::{Message, MessageId, SourceRef};
pub use params::GenerationParams;
pub use source::{KnowledgeSource, SourceId};
