//! Ask Anything CLI library.
//!
//! Configuration, profiles, the chat session model and output formatting
//! for the `ask` command-line client. Questions go either to a running
//! server or to an in-process orchestrator with a lazily loaded local model.

pub mod chat;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod local;
pub mod output;
pub mod repl;

pub use chat::{Asker, Backend, ChatSession, SubmitOutcome};
pub use cli::{Cli, Command};
pub use client::AskClient;
pub use config::Config;
pub use error::{CliError, Result};
pub use local::LocalAsker;
pub use output::Formatter;
