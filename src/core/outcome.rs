//! Per-object operation outcomes and their summary

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Result of one object operation (save or delete)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// HTTP-style status: 200, 400, 404 or 500
    pub code: u16,
    pub message: String,
}

impl OperationOutcome {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn is_success(&self) -> bool {
        self.code == StatusCode::OK.as_u16()
    }
}

/// Success/failure counts of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
}

/// Reduce outcomes into a [`Summary`]
pub fn summarize(outcomes: &[OperationOutcome]) -> Summary {
    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    Summary {
        succeeded,
        failed: outcomes.len() - succeeded,
        total: outcomes.len(),
    }
}

/// Response body of batch store/delete operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<OperationOutcome>,
    pub summary: Summary,
}

impl From<Vec<OperationOutcome>> for BatchResponse {
    fn from(results: Vec<OperationOutcome>) -> Self {
        let summary = summarize(&results);
        Self { results, summary }
    }
}
