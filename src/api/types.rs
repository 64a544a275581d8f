//! API request and response types.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::{NewTransaction, Transaction, TransactionType};

/// Request body for recording a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionRequest {
    pub title: String,
    /// Unsigned magnitude; the sign comes from `type`.
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl From<CreateTransactionRequest> for NewTransaction {
    fn from(req: CreateTransactionRequest) -> Self {
        NewTransaction::new(req.title, req.amount, req.kind)
    }
}

/// Response for listing a session's transactions.
#[derive(Debug, Clone, Serialize)]
pub struct ListTransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// Response for a single transaction lookup.
///
/// The `transaction` key is omitted when nothing matched.
#[derive(Debug, Clone, Serialize)]
pub struct GetTransactionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
}

/// Response for the balance query.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub summary: Summary,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Summary {
    /// Sum of signed amounts.
    pub amount: f64,
}

/// Generic API error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn session_required() -> Self {
        Self::new("SESSION_REQUIRED", "a session identity is required")
    }

    pub fn storage_error(message: impl Into<String>) -> Self {
        Self::new("STORAGE_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a ledger error onto its HTTP status and body.
pub fn api_error(err: LedgerError) -> ApiError {
    match err {
        LedgerError::Validation(message) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::validation(message)))
        }
        LedgerError::SessionRequired => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::session_required()),
        ),
        err @ (LedgerError::Storage(_) | LedgerError::Io(_)) => {
            tracing::error!(error = %err, "storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::storage_error(err.to_string())),
            )
        }
        LedgerError::Internal(message) => {
            tracing::error!(error = %message, "internal failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error(message)),
            )
        }
    }
}
