use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::ChatMessage;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionResponse {
    session_id: String,
    messages: Vec<ChatMessage>,
}

/// Bearer check for the session endpoints. With no `ADMIN_TOKEN` configured
/// every request is rejected.
fn check_auth(headers: &HeaderMap, expected_token: Option<&str>) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    match expected_token {
        Some(expected) if !token.is_empty() && token == expected => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    check_auth(&headers, state.config.admin_token.as_deref())?;

    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;

    let record = session.lock().await;
    Ok(Json(SessionResponse {
        session_id: record.session_id.clone(),
        messages: record.messages.clone(),
    }))
}

// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    check_auth(&headers, state.config.admin_token.as_deref())?;

    if state.sessions.remove(&id) {
        tracing::info!(session_id = %id, "session removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("session {id}")))
    }
}
