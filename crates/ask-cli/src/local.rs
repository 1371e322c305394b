//! In-process answering with a lazily loaded local model.

use crate::config::Profile;
use crate::error::Result;
use ask_core::{AskRequest, AskResponse, Orchestrator, OrchestratorConfig};
use ask_llm::{GeneratorBackend, LazyPipeline, OllamaLoader, PipelineStatus};
use ask_store::SqliteStore;
use std::sync::Arc;
use tracing::info;

type LocalOrchestrator = Orchestrator<SqliteStore, GeneratorBackend, SqliteStore>;

/// Answers questions in-process from a SQLite knowledge file
///
/// The model loads on the first question, or earlier through [`LocalAsker::load`].
pub struct LocalAsker {
    orchestrator: LocalOrchestrator,
}

impl LocalAsker {
    /// Build from a profile; opens the knowledge file but loads no model
    pub fn from_profile(profile: &Profile) -> Result<Self> {
        let store = Arc::new(SqliteStore::new(&profile.knowledge_db)?);
        let loader = OllamaLoader::new(&profile.ollama_endpoint, &profile.local_model);
        Ok(Self::new(store, GeneratorBackend::Local(LazyPipeline::new(loader))))
    }

    /// Build over an open store and any generator
    pub fn new(store: Arc<SqliteStore>, generator: GeneratorBackend) -> Self {
        info!("Local answering with {} sources", store.source_count().unwrap_or(0));
        Self {
            orchestrator: Orchestrator::new(
                store.clone(),
                Arc::new(generator),
                store,
                OrchestratorConfig::local(),
            ),
        }
    }

    /// Answer one question
    pub async fn ask(&self, request: AskRequest) -> Result<AskResponse> {
        Ok(self.orchestrator.handle(request).await?)
    }

    /// Load the model now instead of on the first question
    ///
    /// Returns `false` when the generator is not a lazily loaded pipeline.
    pub async fn load(&self) -> Result<bool> {
        match self.orchestrator.generator().as_local() {
            Some(pipeline) => {
                pipeline.initialize().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pipeline state, when a lazily loaded pipeline is in use
    pub async fn status(&self) -> Option<PipelineStatus> {
        match self.orchestrator.generator().as_local() {
            Some(pipeline) => Some(pipeline.status().await),
            None => None,
        }
    }

    /// Number of sources in the knowledge file
    pub fn source_count(&self) -> Result<usize> {
        Ok(self.orchestrator.store().source_count()?)
    }
}
