//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{
    AskRequest, AskResponse, CreateSessionResponse, ErrorResponse, PersonaInfo, PersonasResponse,
    SessionResponse,
};
use super::AppState;
use crate::persona::PersonaId;
use crate::runtime::SessionError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the page
        .route("/", get(serve_page))
        // Static assets (embedded or filesystem fallback)
        .route("/assets/*path", get(serve_static))
        .route("/api/personas", get(list_personas))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(close_session))
        .route("/api/sessions/:id/ask", post(ask))
        .route("/version", get(get_version))
        .with_state(state)
}

async fn serve_page() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - page not found</h1>".to_string()),
        )
            .into_response(),
    }
}

async fn list_personas() -> Json<PersonasResponse> {
    Json(PersonasResponse {
        personas: PersonaId::ALL
            .into_iter()
            .map(|id| PersonaInfo {
                id,
                label: id.label(),
            })
            .collect(),
    })
}

async fn create_session(State(state): State<AppState>) -> Json<CreateSessionResponse> {
    let session_id = state.sessions.create().await;
    Json(CreateSessionResponse { session_id })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.snapshot(&id).await?;
    Ok(Json(SessionResponse::from(&session)))
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn ask(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let (outcome, session) = state
        .sessions
        .submit(&id, req.persona, &req.question)
        .await?;
    Ok(Json(AskResponse::new(&outcome, &session)))
}

async fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AppError::NotFound(err.to_string()),
            SessionError::Busy => AppError::Conflict(err.to_string()),
            SessionError::Transition(e) => {
                tracing::error!(error = %e, "Turn ended in an invalid transition");
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::DEFAULT_TEMPERATURE;
    use crate::runtime::testing::MockLlmService;
    use crate::runtime::{SessionManager, TurnController};
    use crate::state_machine::TransitionError;
    use std::sync::Arc;

    fn test_state() -> AppState {
        let controller = TurnController::new(Arc::new(MockLlmService::new()), DEFAULT_TEMPERATURE);
        AppState::new(Arc::new(SessionManager::new(controller)))
    }

    #[tokio::test]
    async fn test_closed_session_is_gone() {
        let state = test_state();
        let id = state.sessions.create().await;

        let response = close_session(State(state.clone()), Path(id.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = get_session(State(state.clone()), Path(id.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = close_session(State(state), Path(id)).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_session_errors_map_to_status() {
        let cases = [
            (SessionError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (SessionError::Busy, StatusCode::CONFLICT),
            (
                SessionError::Transition(TransitionError::Busy),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
