//! Interactive chat REPL.

use crate::chat::{Backend, ChatSession, SubmitOutcome};
use crate::commands;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;

/// Run the interactive chat over a session.
pub async fn run_repl(
    session: ChatSession<Backend>,
    history_path: &Path,
    history_size: usize,
    formatter: &Formatter,
) -> Result<()> {
    println!(
        "{}",
        formatter.info("Ask Anything - Type a question, 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(history_size)
        .map_err(editor_error)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = editor.load_history(history_path);

    loop {
        match editor.readline("ask> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_line(line) {
                    ReplCommand::Exit => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    ReplCommand::Help => print_help(formatter),
                    ReplCommand::History => match formatter.format_history(&session.history()) {
                        Ok(out) => println!("{}", out),
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    ReplCommand::Status => {
                        if let Err(e) = commands::execute_status(session.asker(), formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    ReplCommand::Load => load_model(session.asker(), formatter).await,
                    ReplCommand::Ask(question) => ask(&session, &question, formatter).await,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Exit,
    Help,
    History,
    Status,
    Load,
    Ask(String),
}

/// Parse a REPL line; anything that is not a command is a question.
fn parse_repl_line(line: &str) -> ReplCommand {
    match line.trim() {
        "exit" | "quit" | "q" => ReplCommand::Exit,
        "help" | "?" => ReplCommand::Help,
        "history" => ReplCommand::History,
        "status" => ReplCommand::Status,
        "load" => ReplCommand::Load,
        question => ReplCommand::Ask(question.to_string()),
    }
}

async fn ask(session: &ChatSession<Backend>, question: &str, formatter: &Formatter) {
    println!("{}", formatter.info("Thinking..."));

    match session.submit(question).await {
        SubmitOutcome::Answered(message) => match formatter.format_answer(&message) {
            Ok(out) => println!("{}\n", out),
            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
        },
        SubmitOutcome::Failed(notice) => eprintln!("{}", formatter.error(&notice)),
        SubmitOutcome::Busy => eprintln!("{}", formatter.warning("Still answering the previous question")),
        SubmitOutcome::Empty => {}
    }
}

async fn load_model(backend: &Backend, formatter: &Formatter) {
    let Backend::Local(local) = backend else {
        println!("{}", formatter.info("The server loads its own model"));
        return;
    };

    println!("{}", formatter.info("Loading model..."));
    match local.load().await {
        Ok(_) => println!("{}", formatter.success("Model ready")),
        Err(e) => eprintln!("{}", formatter.error(&format!("Model failed to load: {}", e))),
    }
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        e
    )))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <question>      - Ask a question");
    println!("  history         - Show questions asked this session");
    println!("  status          - Show server or model status");
    println!("  load            - Load the local model now");
    println!("  help, ?         - Show this help");
    println!("  exit, quit, q   - Exit");
    println!();
}
