//! Lazily loaded local generation pipeline
//!
//! The pipeline is built on first use (or on an explicit `initialize`) and
//! then kept for the lifetime of the owner. Lifecycle:
//!
//! ```text
//! Uninitialized ──► Initializing ──► Ready
//!        ▲               │
//!        └──── Failed ◄──┘   (next call starts a new attempt)
//! ```
//!
//! Callers that arrive while a load is in flight await the same shared
//! future; a second load is never started. A failed load caches nothing.

use crate::ollama::{OllamaProvider, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::LlmError;
use ask_domain::traits::AnswerGenerator;
use ask_domain::GenerationParams;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Builds a generation pipeline
#[async_trait]
pub trait PipelineLoader: Send + Sync + 'static {
    /// The pipeline produced by a successful load
    type Pipeline: AnswerGenerator<Error = LlmError> + 'static;

    /// Human-readable description for logs and progress display
    fn describe(&self) -> String;

    /// Construct the pipeline
    async fn load(&self) -> Result<Self::Pipeline, LlmError>;
}

/// Observable lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    /// No load attempted yet
    Uninitialized,
    /// A load is in flight
    Initializing,
    /// Pipeline is loaded and cached
    Ready,
    /// The last load failed; the next call retries
    Failed(String),
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Uninitialized => write!(f, "not loaded"),
            PipelineStatus::Initializing => write!(f, "loading"),
            PipelineStatus::Ready => write!(f, "ready"),
            PipelineStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

type PendingLoad<P> = Shared<BoxFuture<'static, Result<Arc<P>, LlmError>>>;

enum State<P> {
    Uninitialized,
    Initializing { attempt: u64, pending: PendingLoad<P> },
    Ready(Arc<P>),
    Failed { reason: String },
}

/// A pipeline constructed on first use and cached afterwards
pub struct LazyPipeline<L: PipelineLoader> {
    loader: Arc<L>,
    name: String,
    state: Mutex<State<L::Pipeline>>,
    attempts: AtomicU64,
}

impl<L: PipelineLoader> LazyPipeline<L> {
    /// Wrap a loader; nothing is loaded until first use
    pub fn new(loader: L) -> Self {
        let name = format!("local ({})", loader.describe());
        Self {
            loader: Arc::new(loader),
            name,
            state: Mutex::new(State::Uninitialized),
            attempts: AtomicU64::new(0),
        }
    }

    /// Current lifecycle state
    pub async fn status(&self) -> PipelineStatus {
        match &*self.state.lock().await {
            State::Uninitialized => PipelineStatus::Uninitialized,
            State::Initializing { .. } => PipelineStatus::Initializing,
            State::Ready(_) => PipelineStatus::Ready,
            State::Failed { reason } => PipelineStatus::Failed(reason.clone()),
        }
    }

    /// Number of load attempts started so far
    pub fn load_attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Load the pipeline, or join the load already in flight
    ///
    /// Returns the cached pipeline once `Ready`.
    ///
    /// # Errors
    ///
    /// Returns the loader's error. The state moves to `Failed` and the next
    /// call starts a new attempt.
    pub async fn initialize(&self) -> Result<Arc<L::Pipeline>, LlmError> {
        let (attempt, pending) = {
            let mut state = self.state.lock().await;
            match &*state {
                State::Ready(pipeline) => return Ok(Arc::clone(pipeline)),
                State::Initializing { attempt, pending } => (*attempt, pending.clone()),
                State::Uninitialized | State::Failed { .. } => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    info!("Loading {} (attempt {})", self.name, attempt);

                    let loader = Arc::clone(&self.loader);
                    let pending = async move { loader.load().await.map(Arc::new) }
                        .boxed()
                        .shared();
                    *state = State::Initializing {
                        attempt,
                        pending: pending.clone(),
                    };
                    (attempt, pending)
                }
            }
        };

        let result = pending.await;

        // Only the first caller back for this attempt records the outcome
        let mut state = self.state.lock().await;
        if matches!(&*state, State::Initializing { attempt: current, .. } if *current == attempt) {
            *state = match &result {
                Ok(pipeline) => {
                    info!("{} ready", self.name);
                    State::Ready(Arc::clone(pipeline))
                }
                Err(e) => {
                    error!("Failed to load {}: {}", self.name, e);
                    State::Failed {
                        reason: e.to_string(),
                    }
                }
            };
        }

        result
    }
}

#[async_trait]
impl<L: PipelineLoader> AnswerGenerator for LazyPipeline<L> {
    type Error = LlmError;

    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Option<String>, Self::Error> {
        let pipeline = self.initialize().await?;
        pipeline.generate(prompt, params).await
    }
}

/// Loads a local Ollama model: availability check, then warm-up
pub struct OllamaLoader {
    endpoint: String,
    model: String,
    timeout: Option<Duration>,
}

impl OllamaLoader {
    /// Loader for `model` at `endpoint`
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            timeout: None,
        }
    }

    /// Set the transport timeout used by the loaded provider
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for OllamaLoader {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
    }
}

#[async_trait]
impl PipelineLoader for OllamaLoader {
    type Pipeline = OllamaProvider;

    fn describe(&self) -> String {
        format!("ollama:{}", self.model)
    }

    async fn load(&self) -> Result<OllamaProvider, LlmError> {
        let mut provider = OllamaProvider::new(&self.endpoint, &self.model);
        if let Some(timeout) = self.timeout {
            provider = provider.with_timeout(timeout);
        }

        let prepared = async {
            provider.ensure_available().await?;
            provider.warm_up().await
        };

        match prepared.await {
            Ok(()) => Ok(provider),
            Err(e @ LlmError::ModelNotAvailable(_)) => Err(e),
            Err(e) => Err(LlmError::PipelineLoad(e.to_string())),
        }
    }
}
