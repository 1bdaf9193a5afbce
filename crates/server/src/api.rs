//! HTTP API for the reading trainer backend.
//!
//! The frontend talks to these routes only; endpoint URLs and credentials
//! for the external analysis and evaluation services never leave the
//! server process.
//!
//! # Endpoints
//!
//! - `POST /api/analyze` - Break a passage into labeled paragraphs
//! - `POST /api/evaluate` - Judge one summary and role selection
//! - `GET /api/passages` - List the passage catalog
//! - `GET /api/session` - Fetch the active session
//! - `DELETE /api/session` - Discard the active session
//! - `POST /api/session/select` - Start a session on a random passage
//! - `POST /api/session/submit` - Submit an attempt for the active paragraph
//! - `POST /api/session/reveal` - Reveal the expert answer and advance

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use services::analysis::AnalysisService;
use services::catalog::CatalogService;
use services::error::SessionFlowError;
use services::evaluation::{EvaluationOutcome, EvaluationRequest, EvaluationService};
use services::flow::SessionFlowService;
use trainer_core::model::{Difficulty, Paragraph, PassageId, Role, Session};

//
// ─── WIRE TYPES ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub full_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub paragraphs: Vec<Paragraph>,
}

/// Catalog row without the passage body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassageSummary {
    pub id: PassageId,
    pub title: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectRequest {
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub paragraph_index: usize,
    pub user_summary: String,
    pub role_selected: String,
    #[serde(default)]
    pub pivots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub is_valid: bool,
    pub hint: String,
    pub session: Session,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealRequest {
    pub paragraph_index: usize,
}

/// Error body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

//
// ─── APPLICATION STATE ──────────────────────────────────────────────────────
//

/// Shared state for the HTTP server.
///
/// The active session lives in a single slot; handlers that mutate it hold
/// the lock across the whole read-judge-write step so two submissions
/// cannot interleave.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub analysis: AnalysisService,
    pub evaluation: EvaluationService,
    pub flow: SessionFlowService,
    session: Arc<Mutex<Option<Session>>>,
}

impl AppState {
    #[must_use]
    pub fn new(
        catalog: CatalogService,
        analysis: AnalysisService,
        evaluation: EvaluationService,
        flow: SessionFlowService,
    ) -> Self {
        Self {
            catalog,
            analysis,
            evaluation,
            flow,
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Seeds the session slot from a persisted snapshot, for restart
    /// recovery.
    #[must_use]
    pub fn with_restored_session(self, session: Option<Session>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            ..self
        }
    }
}

//
// ─── API ERROR ──────────────────────────────────────────────────────────────
//

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<SessionFlowError> for ApiError {
    fn from(error: SessionFlowError) -> Self {
        match error {
            SessionFlowError::Session(e) => Self::BadRequest(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => {
                warn!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

//
// ─── ROUTER ─────────────────────────────────────────────────────────────────
//

/// Builds the router with all API routes under `/api`, plus CORS and
/// request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/analyze", post(handle_analyze))
        .route("/evaluate", post(handle_evaluate))
        .route("/passages", get(handle_list_passages))
        .route("/session", get(handle_get_session).delete(handle_reset))
        .route("/session/select", post(handle_select))
        .route("/session/submit", post(handle_submit))
        .route("/session/reveal", post(handle_reveal));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

//
// ─── HANDLERS ───────────────────────────────────────────────────────────────
//

/// Handler for `POST /api/analyze`.
async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let paragraphs = state
        .analysis
        .analyze(&request.full_text)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(count = paragraphs.len(), "passage analyzed");
    Ok(Json(AnalyzeResponse { paragraphs }))
}

/// Handler for `POST /api/evaluate`.
///
/// Always answers 200: gateway failures surface as a failed verdict with a
/// fixed hint, never as an error status.
async fn handle_evaluate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EvaluationRequest>,
) -> Json<EvaluationOutcome> {
    Json(state.evaluation.evaluate(&request).await)
}

/// Handler for `GET /api/passages`.
async fn handle_list_passages(State(state): State<Arc<AppState>>) -> Json<Vec<PassageSummary>> {
    let summaries = state
        .catalog
        .passages()
        .iter()
        .map(|p| PassageSummary {
            id: p.id.clone(),
            title: p.title.clone(),
            difficulty: p.difficulty,
        })
        .collect();
    Json(summaries)
}

/// Handler for `GET /api/session`.
async fn handle_get_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let slot = state.session.lock().await;
    let session = slot
        .clone()
        .ok_or_else(|| ApiError::NotFound("no active session".to_owned()))?;
    Ok(Json(SessionResponse { session }))
}

/// Handler for `POST /api/session/select`.
///
/// Picks a random passage from the requested tier, analyzes it, and starts
/// a fresh session on it. A failed analysis leaves the previous session in
/// place.
async fn handle_select(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let passage = state
        .catalog
        .pick_random(request.difficulty)
        .cloned()
        .ok_or_else(|| {
            ApiError::NotFound(format!("no passages at difficulty {}", request.difficulty))
        })?;

    let session = state.flow.select_passage(&passage).await?;
    info!(passage = %passage.id, difficulty = %passage.difficulty, "session started");

    let mut slot = state.session.lock().await;
    *slot = Some(session.clone());
    Ok(Json(SessionResponse { session }))
}

/// Handler for `POST /api/session/submit`.
async fn handle_submit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    if request.user_summary.trim().is_empty() {
        return Err(ApiError::BadRequest("summary must not be blank".to_owned()));
    }
    if request.role_selected.trim().is_empty() {
        return Err(ApiError::BadRequest("role must not be blank".to_owned()));
    }

    let mut slot = state.session.lock().await;
    let session = slot
        .as_mut()
        .ok_or_else(|| ApiError::NotFound("no active session".to_owned()))?;

    let result = state
        .flow
        .submit_answer(
            session,
            request.paragraph_index,
            request.user_summary,
            Role::from(request.role_selected),
            request.pivots,
        )
        .await?;

    info!(
        paragraph = request.paragraph_index,
        is_valid = result.outcome.is_valid,
        is_complete = result.is_complete,
        "attempt judged"
    );

    Ok(Json(SubmitResponse {
        is_valid: result.outcome.is_valid,
        hint: result.outcome.hint,
        session: session.clone(),
    }))
}

/// Handler for `POST /api/session/reveal`.
async fn handle_reveal(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RevealRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut slot = state.session.lock().await;
    let session = slot
        .as_mut()
        .ok_or_else(|| ApiError::NotFound("no active session".to_owned()))?;

    state
        .flow
        .reveal_answer(session, request.paragraph_index)
        .await?;
    info!(paragraph = request.paragraph_index, "expert answer revealed");

    Ok(Json(SessionResponse {
        session: session.clone(),
    }))
}

/// Handler for `DELETE /api/session`.
async fn handle_reset(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.flow.reset().await?;
    let mut slot = state.session.lock().await;
    *slot = None;
    info!("session discarded");
    Ok(StatusCode::NO_CONTENT)
}
