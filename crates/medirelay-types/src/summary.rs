//! Session summary types.

use serde::{Deserialize, Serialize};

/// Result of summarizing a session: the free-text summary and the short
/// diagnosis label extracted from it. Derived once per session end; not
/// persisted locally -- ownership transfers to the records backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub summary: String,
    pub diagnosis: String,
}

/// Wire payload sent to the records backend's store-summary endpoint.
///
/// Field names match the backend's contract exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSummary {
    pub summary_content: String,
    pub user_id: String,
    pub diagnosis_content: String,
}
