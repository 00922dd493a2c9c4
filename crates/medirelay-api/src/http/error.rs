//! Application error type mapping relay failures to the HTTP wire contract.
//!
//! Every failure becomes a 500 with a `{error, details}` body: a generic
//! message per operation plus the underlying error text. The client sees
//! no distinction between upstream and storage-forward failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use medirelay_types::error::RelayError;

/// Relay failure tagged with the operation it occurred in, so the generic
/// message matches the route.
#[derive(Debug)]
pub enum AppError {
    /// Failure while relaying a chat turn.
    Chat(RelayError),
    /// Failure while ending a conversation.
    EndConversation(RelayError),
    /// Records backend probe failure.
    RecordsProbe(RelayError),
}

impl AppError {
    fn message(&self) -> &'static str {
        match self {
            AppError::Chat(_) => "An error occurred",
            AppError::EndConversation(_) => {
                "An error occurred while ending the conversation"
            }
            AppError::RecordsProbe(_) => "Failed to connect to records backend",
        }
    }

    fn source(&self) -> &RelayError {
        match self {
            AppError::Chat(e) | AppError::EndConversation(e) | AppError::RecordsProbe(e) => e,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = self.source().to_string();
        tracing::error!(error = %details, "request failed");

        let body = json!({
            "error": self.message(),
            "details": details,
        });

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
