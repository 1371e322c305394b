//! Chat session: an append-only history of answered questions.

use crate::client::AskClient;
use crate::error::{CliError, Result};
use crate::local::LocalAsker;
use ask_core::{AskRequest, AskResponse};
use ask_domain::{Message, SessionId};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Notice shown when a submission fails
pub const FAILURE_NOTICE: &str = "Failed to get an answer. Please try again.";

/// Something that answers questions
#[async_trait]
pub trait Asker: Send + Sync {
    /// Answer one question within a session
    async fn ask(&self, question: &str, session_id: &SessionId) -> Result<AskResponse>;
}

#[async_trait]
impl Asker for AskClient {
    async fn ask(&self, question: &str, session_id: &SessionId) -> Result<AskResponse> {
        let request = AskRequest::new(question).with_session(session_id.as_str());
        AskClient::ask(self, &request).await
    }
}

#[async_trait]
impl Asker for LocalAsker {
    async fn ask(&self, question: &str, session_id: &SessionId) -> Result<AskResponse> {
        let request = AskRequest::new(question).with_session(session_id.as_str());
        LocalAsker::ask(self, request).await
    }
}

/// Remote or local answering, chosen by profile
pub enum Backend {
    /// Through a running server
    Remote(AskClient),
    /// In-process
    Local(LocalAsker),
}

#[async_trait]
impl Asker for Backend {
    async fn ask(&self, question: &str, session_id: &SessionId) -> Result<AskResponse> {
        match self {
            Backend::Remote(client) => Asker::ask(client, question, session_id).await,
            Backend::Local(local) => Asker::ask(local, question, session_id).await,
        }
    }
}

/// Result of one submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Input was empty after trimming; nothing was sent
    Empty,
    /// Another submission is in flight; nothing was sent
    Busy,
    /// The question was answered and appended to history
    Answered(Message),
    /// The question was not answered; history is unchanged
    Failed(String),
}

/// Clears the in-flight flag when a submission finishes or is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// An interactive chat over an [`Asker`]
///
/// Holds one session id for its lifetime. At most one submission is
/// outstanding at a time; history only grows, one message per answer.
pub struct ChatSession<A> {
    asker: A,
    session_id: SessionId,
    history: Mutex<Vec<Message>>,
    in_flight: AtomicBool,
}

impl<A: Asker> ChatSession<A> {
    /// Start a session with a fresh session id
    pub fn new(asker: A) -> Self {
        Self::with_session(asker, SessionId::generate())
    }

    /// Start a session with a given session id
    pub fn with_session(asker: A, session_id: SessionId) -> Self {
        Self {
            asker,
            session_id,
            history: Mutex::new(Vec::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// The underlying asker
    pub fn asker(&self) -> &A {
        &self.asker
    }

    /// Session id sent with every question
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Whether a submission is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Snapshot of the history, oldest first
    pub fn history(&self) -> Vec<Message> {
        self.lock_history().clone()
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<Message>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit a question
    ///
    /// Empty input and submissions made while another is outstanding are
    /// ignored. A failure leaves history untouched and returns a notice.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let question = input.trim();
        if question.is_empty() {
            return SubmitOutcome::Empty;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SubmitOutcome::Busy;
        }
        let _guard = InFlight(&self.in_flight);

        match self.asker.ask(question, &self.session_id).await {
            Ok(response) => {
                let message = Message::new(question, response.answer, &response.sources);
                self.lock_history().push(message.clone());
                SubmitOutcome::Answered(message)
            }
            Err(e) => {
                warn!("Question failed: {}", e);
                SubmitOutcome::Failed(failure_notice(&e))
            }
        }
    }
}

fn failure_notice(error: &CliError) -> String {
    match error {
        CliError::Connection(_) => format!("{} (server unreachable)", FAILURE_NOTICE),
        _ => FAILURE_NOTICE.to_string(),
    }
}
