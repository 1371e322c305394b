//! HTTP request handlers for the server.
//!
//! Implements the question endpoint and the health check using axum.

use ask_core::{AskError, AskRequest, AskResponse, Orchestrator};
use ask_domain::traits::AnswerGenerator;
use ask_llm::GeneratorBackend;
use ask_store::StoreBackend;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// The orchestrator as wired by the server
pub type AppOrchestrator = Orchestrator<StoreBackend, GeneratorBackend, StoreBackend>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Question answering pipeline
    pub orchestrator: Arc<AppOrchestrator>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Server version
    pub version: String,
    /// Active generation backend
    pub generator: String,
    /// Active storage backend
    pub store: String,
    /// Local pipeline state, when the local backend is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request body could not be parsed
    BadRequest(String),
    /// Orchestrator rejected or failed the request
    Ask(AskError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Ask(e @ AskError::InvalidInput(_)) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Ask(e @ AskError::GenerationFailed) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<AskError> for AppError {
    fn from(e: AskError) -> Self {
        AppError::Ask(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest("Invalid request body".to_string())
    }
}

/// POST /ask-anything - Answer a question from the knowledge base
async fn ask_anything(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let Json(request) = payload?;
    let response = state.orchestrator.handle(request).await?;
    Ok(Json(response))
}

/// GET /health - Backend report
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let generator = state.orchestrator.generator();
    let pipeline = match generator.as_local() {
        Some(local) => Some(local.status().await.to_string()),
        None => None,
    };

    Json(HealthCheckResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        generator: generator.name().to_string(),
        store: state.orchestrator.store().name().to_string(),
        pipeline,
    })
}

/// Build the CORS layer for the configured origins
///
/// An empty list allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static("content-type"),
        ]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState, allowed_origins: &[String]) -> AxumRouter {
    AxumRouter::new()
        .route("/ask-anything", post(ask_anything))
        .route("/health", get(health_check))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ask_core::OrchestratorConfig;
    use ask_llm::MockProvider;
    use ask_store::SqliteStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let store = Arc::new(StoreBackend::Sqlite(SqliteStore::in_memory().unwrap()));
        let generator = Arc::new(GeneratorBackend::Mock(MockProvider::new("answer")));
        AppState {
            orchestrator: Arc::new(Orchestrator::new(
                store.clone(),
                generator,
                store,
                OrchestratorConfig::default(),
            )),
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state(), &[]);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ask_anything() {
        let app = create_router(create_test_state(), &[]);

        let request = Request::builder()
            .method("POST")
            .uri("/ask-anything")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question": "What is Re:cinq?"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_statuses() {
        let response = AppError::Ask(AskError::GenerationFailed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::Ask(AskError::InvalidInput("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::BadRequest("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
