//! Session end endpoint.
//!
//! POST /end-conversation

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use medirelay_core::relay::DEFAULT_SESSION;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the end-conversation endpoint.
///
/// `user_Id` keeps its historical wire casing.
#[derive(Debug, Deserialize)]
pub struct EndConversationRequest {
    #[serde(rename = "user_Id")]
    pub user_id: String,
    /// Session to end; absent means the default session.
    pub session_id: Option<String>,
}

/// Response body for the end-conversation endpoint.
#[derive(Debug, Serialize)]
pub struct EndConversationResponse {
    pub message: String,
}

/// POST /end-conversation - summarize the session, forward the summary and
/// diagnosis to the records backend, and reset the session.
pub async fn end_conversation(
    State(state): State<AppState>,
    Json(body): Json<EndConversationRequest>,
) -> Result<Json<EndConversationResponse>, AppError> {
    let session = body.session_id.as_deref().unwrap_or(DEFAULT_SESSION);

    state
        .relay
        .handle_end_session(session, &body.user_id)
        .await
        .map_err(AppError::EndConversation)?;

    Ok(Json(EndConversationResponse {
        message: "Conversation ended and summary stored successfully.".to_string(),
    }))
}
