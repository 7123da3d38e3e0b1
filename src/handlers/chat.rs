use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::models::now_local;
use crate::services::conversation;
use crate::state::AppState;

pub const DEFAULT_SESSION_ID: &str = "default";
pub const EMPTY_MESSAGE_REPLY: &str = "Please type a message.";

fn default_session_id() -> String {
    DEFAULT_SESSION_ID.to_string()
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_session_id", alias = "sessionId")]
    pub session_id: String,
}

/// Always returned with 200. Failures are described in `response`; `error`
/// carries the same failure for clients that want to branch on it.
#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let message = payload.message;
    let session_id = match payload.session_id.trim() {
        "" => default_session_id(),
        id => id.to_string(),
    };

    let span = tracing::info_span!(
        "chat",
        request_id = %uuid::Uuid::new_v4(),
        session_id = %session_id,
    );

    async move {
        if message.trim().is_empty() {
            tracing::warn!("ignoring blank chat message");
            return Json(ChatResponse {
                response: EMPTY_MESSAGE_REPLY.to_string(),
                error: Some("empty message".to_string()),
            });
        }

        tracing::info!(message = %message, "incoming chat message");

        match conversation::process_message(&state, &session_id, &message, now_local()).await {
            Ok(response) => Json(ChatResponse {
                response,
                error: None,
            }),
            Err(e) => {
                tracing::error!(error = %e, "failed to handle chat message");
                Json(ChatResponse {
                    response: e.user_message(),
                    error: Some(e.to_string()),
                })
            }
        }
    }
    .instrument(span)
    .await
}
