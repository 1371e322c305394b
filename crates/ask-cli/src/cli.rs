//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Ask Anything CLI - Ask questions about Re:cinq from the terminal.
#[derive(Debug, Parser)]
#[command(name = "ask")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ASK_CONFIG")]
    pub config: Option<String>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (answer text only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask a single question
    Ask(AskArgs),

    /// Start an interactive chat session
    #[command(alias = "repl")]
    Chat(ChatArgs),

    /// Load knowledge sources from a JSON file into the local knowledge file
    Ingest(IngestArgs),

    /// Show server health or local pipeline state
    Status(StatusArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Question text
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Answer in-process instead of through the server
    #[arg(short, long)]
    pub local: bool,

    /// Session id to continue
    #[arg(short, long)]
    pub session: Option<String>,
}

impl AskArgs {
    /// Question words joined with single spaces.
    pub fn question_text(&self) -> String {
        self.question.join(" ")
    }
}

/// Arguments for the chat command.
#[derive(Debug, Default, Parser)]
pub struct ChatArgs {
    /// Answer in-process instead of through the server
    #[arg(short, long)]
    pub local: bool,
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// JSON file holding an array of knowledge sources
    pub file: String,

    /// Knowledge file to write (defaults to the profile's)
    #[arg(long)]
    pub db: Option<String>,
}

/// Arguments for the status command.
#[derive(Debug, Default, Parser)]
pub struct StatusArgs {
    /// Report the local pipeline instead of the server
    #[arg(short, long)]
    pub local: bool,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Server URL
        #[arg(short, long)]
        url: String,
        /// Answer in-process by default
        #[arg(long)]
        local: bool,
        /// Model for local answering
        #[arg(long)]
        model: Option<String>,
        /// Knowledge file for local answering
        #[arg(long)]
        db: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
