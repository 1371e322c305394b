//! Ask command implementation.

use crate::chat::Asker;
use crate::cli::AskArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use ask_domain::{Message, SessionId};

/// Execute the ask command.
pub async fn execute_ask<A: Asker>(args: AskArgs, asker: &A, formatter: &Formatter) -> Result<()> {
    let session_id = SessionId::or_generate(args.session.as_deref());
    let message = ask_once(asker, &args.question_text(), &session_id).await?;

    println!("{}", formatter.format_answer(&message)?);
    if formatter.format() == OutputFormat::Table {
        eprintln!("{}", formatter.info(&format!("Session: {}", session_id)));
    }

    Ok(())
}

/// Ask one question and shape the reply as a chat message.
async fn ask_once<A: Asker>(asker: &A, question: &str, session_id: &SessionId) -> Result<Message> {
    let response = asker.ask(question, session_id).await?;
    Ok(Message::new(question.trim(), response.answer, &response.sources))
}
