//! Records backend diagnostics.
//!
//! GET /test-django-connection

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::http::error::AppError;
use crate::state::AppState;

/// Response body for the records backend probe.
#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub message: String,
    pub data: serde_json::Value,
}

/// GET /test-django-connection - probe the records backend's root endpoint.
/// Purely diagnostic; no state mutation.
pub async fn test_django_connection(
    State(state): State<AppState>,
) -> Result<Json<ProbeResponse>, AppError> {
    let data = state
        .relay
        .check_storage()
        .await
        .map_err(AppError::RecordsProbe)?;

    Ok(Json(ProbeResponse {
        message: "Connection successful".to_string(),
        data,
    }))
}
