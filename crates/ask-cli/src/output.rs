//! Output formatting for the CLI.

use crate::client::HealthReport;
use crate::config::OutputFormat;
use crate::error::Result;
use ask_domain::Message;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format one answered question.
    pub fn format_answer(&self, message: &Message) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(message)?),
            OutputFormat::Table => Ok(self.format_answer_text(message)),
            OutputFormat::Quiet => Ok(message.answer.clone()),
        }
    }

    /// Answer followed by a numbered source list.
    fn format_answer_text(&self, message: &Message) -> String {
        let mut out = message.answer.clone();

        if !message.sources.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.colorize("Sources:", "cyan"));
            for (i, source) in message.sources.iter().enumerate() {
                out.push_str(&format!("\n  {}. {}", i + 1, source.title));
                if let Some(url) = &source.url {
                    out.push_str(&format!(" ({})", url));
                }
            }
        }

        out
    }

    /// Format the chat history.
    pub fn format_history(&self, messages: &[Message]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(messages)?),
            OutputFormat::Table => Ok(self.format_history_table(messages)),
            OutputFormat::Quiet => Ok(messages
                .iter()
                .map(|m| m.question.clone())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_history_table(&self, messages: &[Message]) -> String {
        if messages.is_empty() {
            return self.colorize("No questions asked yet.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Question", "Answer", "Sources"]);

        for (i, message) in messages.iter().enumerate() {
            builder.push_record([
                (i + 1).to_string(),
                truncate(&message.question, 40),
                truncate(&message.answer, 60),
                message.sources.len().to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a server health report.
    pub fn format_health(&self, report: &HealthReport, server_url: &str) -> String {
        let mut out = self.success(&format!("{} is {}", server_url, report.status));
        out.push_str(&format!("\n  Version:   {}", report.version));
        out.push_str(&format!("\n  Generator: {}", report.generator));
        out.push_str(&format!("\n  Store:     {}", report.store));
        if let Some(pipeline) = &report.pipeline {
            out.push_str(&format!("\n  Pipeline:  {}", pipeline));
        }
        out
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Shorten to at most `max` characters, marking the cut.
fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let cut: String = single_line.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
