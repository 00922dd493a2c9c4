//! HttpSummarySink -- concrete [`SummarySink`] for the external records
//! backend.
//!
//! Forwards session summaries with `POST {base}/users/store-summary/` and
//! probes liveness with `GET {base}/`.

use std::time::Duration;

use medirelay_core::storage::SummarySink;
use medirelay_types::error::StorageError;
use medirelay_types::summary::StoredSummary;

/// HTTP client for the records backend.
#[derive(Debug, Clone)]
pub struct HttpSummarySink {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSummarySink {
    /// Create a sink for the backend at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn map_send_error(e: reqwest::Error) -> StorageError {
        if e.is_timeout() {
            StorageError::Timeout(e.to_string())
        } else {
            StorageError::Network(e.to_string())
        }
    }
}

impl SummarySink for HttpSummarySink {
    fn name(&self) -> &str {
        "records-http"
    }

    async fn store(&self, summary: &StoredSummary) -> Result<(), StorageError> {
        let url = format!("{}/users/store-summary/", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(summary)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %body, "records backend rejected summary");
            return Err(StorageError::Http {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(user_id = %summary.user_id, response = %body, "summary stored");
        Ok(())
    }

    async fn health(&self) -> Result<serde_json::Value, StorageError> {
        let url = format!("{}/", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(StorageError::Http {
                status: status.as_u16(),
                body,
            });
        }

        // The backend may answer with JSON or plain text; relay either.
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_maps_connection_refusal_to_network_error() {
        // Port 9 (discard) is unassigned on loopback; the connection fails fast.
        let sink = HttpSummarySink::new("http://127.0.0.1:9");
        let summary = StoredSummary {
            summary_content: "s".to_string(),
            user_id: "u".to_string(),
            diagnosis_content: "d".to_string(),
        };

        let err = sink.store(&summary).await.unwrap_err();
        assert!(matches!(err, StorageError::Network(_) | StorageError::Timeout(_)));
        assert!(err.is_transient());
    }
}
