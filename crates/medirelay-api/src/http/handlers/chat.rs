//! Chat turn endpoint.
//!
//! POST /chat

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use medirelay_core::relay::DEFAULT_SESSION;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user message to relay.
    pub message: String,
    /// Session to append to; absent means the default session.
    pub session_id: Option<String>,
}

/// Response body for the chat endpoint.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /chat - relay one chat turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session = body.session_id.as_deref().unwrap_or(DEFAULT_SESSION);

    let reply = state
        .relay
        .handle_chat(session, &body.message)
        .await
        .map_err(AppError::Chat)?;

    Ok(Json(ChatResponse { reply }))
}
