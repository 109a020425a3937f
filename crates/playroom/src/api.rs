//! REST interface over the session store.

use crate::session::SessionError;
use crate::store::{SessionSnapshot, SessionStore, SessionSummary, StoreError};
use crate::variant::{MoveInput, NewGame};
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    store: SessionStore,
}

/// Builds the application router.
pub fn router(store: SessionStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/games", post(create_game).get(list_games))
        .route("/api/games/{id}", get(get_game).delete(delete_game))
        .route("/api/games/{id}/move", post(make_move))
        .route("/api/games/{id}/reset", post(reset_game))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(AppState { store })
}

/// Error body `{"error": "..."}` with a status code.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}: {}", status, message)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl std::error::Error for ApiError {}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Full(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::Session(SessionError::IllegalMove(_) | SessionError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            StoreError::Session(SessionError::Opponent(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

/// Reply to a move request.
#[derive(Debug, Serialize)]
struct MoveResponse {
    /// False when the game was already over and nothing changed.
    accepted: bool,
    #[serde(flatten)]
    game: SessionSnapshot,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError {
        status: StatusCode::NOT_FOUND,
        message: format!("Game {} not found", raw),
    })
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(state))]
async fn create_game(
    State(state): State<AppState>,
    request: Result<Json<NewGame>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    let Json(request) = request?;
    let snapshot = state.store.create(&request)?;
    info!(session_id = %snapshot.id(), "Game created");
    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[instrument(skip(state))]
async fn list_games(State(state): State<AppState>) -> Json<Vec<SessionSummary>> {
    Json(state.store.list())
}

#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.store.view(parse_id(&id)?)?))
}

#[instrument(skip(state))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    input: Result<Json<MoveInput>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let Json(input) = input?;
    let (accepted, game) = state
        .store
        .apply_move(parse_id(&id)?, &input)
        .inspect_err(|e| warn!(error = %e, "Move refused"))?;
    Ok(Json(MoveResponse { accepted, game }))
}

#[instrument(skip(state))]
async fn reset_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.store.reset(parse_id(&id)?)?))
}

#[instrument(skip(state))]
async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.remove(parse_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}
