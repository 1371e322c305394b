//! Core Orchestrator implementation

use crate::config::OrchestratorConfig;
use crate::error::AskError;
use crate::prompt::PromptBuilder;
use crate::types::{AskRequest, AskResponse};
use ask_domain::traits::{AnswerGenerator, ConversationLog, KnowledgeStore};
use ask_domain::{ConversationRecord, SessionId};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Answers questions from the knowledge store
///
/// One question is one sequential chain: search the store, generate from a
/// prompt built over the matches, then append to the conversation log.
/// Store and log failures are absorbed; a generator failure fails the request.
pub struct Orchestrator<S, G, L> {
    store: Arc<S>,
    generator: Arc<G>,
    log: Arc<L>,
    config: OrchestratorConfig,
}

impl<S, G, L> Orchestrator<S, G, L>
where
    S: KnowledgeStore,
    G: AnswerGenerator,
    L: ConversationLog,
{
    /// Create a new Orchestrator
    ///
    /// Collaborators are shared so one backend can serve as both the store
    /// and the log.
    pub fn new(store: Arc<S>, generator: Arc<G>, log: Arc<L>, config: OrchestratorConfig) -> Self {
        Self {
            store,
            generator,
            log,
            config,
        }
    }

    /// The generation backend
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The knowledge store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Answer one question
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty or whitespace-only question; nothing
    ///   external is called
    /// - `GenerationFailed` when the generator errors; nothing is logged
    pub async fn handle(&self, request: AskRequest) -> Result<AskResponse, AskError> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(AskError::InvalidInput("Question is required".to_string()));
        }
        let session_id = SessionId::or_generate(request.session_id.as_deref());

        info!("Processing question for session {}", session_id);

        let sources = match self.store.search(question).await {
            Ok(sources) => sources,
            Err(e) => {
                warn!("Knowledge search failed, continuing without context: {}", e);
                Vec::new()
            }
        };
        debug!("Matched {} sources", sources.len());

        let prompt = PromptBuilder::new(&self.config.preamble, &self.config.answer_cue)
            .with_sources(&sources)
            .build(question);
        debug!("Prompt length: {} chars", prompt.len());

        let generated = match self.generator.generate(&prompt, &self.config.params).await {
            Ok(text) => text,
            Err(e) => {
                error!("Generation failed on {}: {}", self.generator.name(), e);
                return Err(AskError::GenerationFailed);
            }
        };

        let answer = match generated.filter(|text| !text.trim().is_empty()) {
            Some(text) => text,
            None => {
                warn!(
                    "{} returned no usable text, using fallback answer",
                    self.generator.name()
                );
                self.config.fallback_answer.clone()
            }
        };

        let record = ConversationRecord::new(question, &answer, &sources, Some(session_id.clone()));
        if let Err(e) = self.log.append(&record).await {
            error!("Failed to store conversation: {}", e);
        }

        info!("Answered question with {} sources", sources.len());

        Ok(AskResponse {
            answer,
            sources,
            session_id,
        })
    }
}
