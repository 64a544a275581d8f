//! REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use super::session::{ActiveSession, CallerSession, SessionCookie};
use super::types::{
    api_error, ApiError, CreateTransactionRequest, GetTransactionResponse,
    ListTransactionsResponse, Summary, SummaryResponse,
};
use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Ledger,
    pub cookie: Arc<SessionCookie>,
}

impl AppState {
    /// State backed by an in-memory ledger and the default cookie.
    pub fn new() -> Self {
        Self::with_ledger(Ledger::in_memory(), SessionCookie::default())
    }

    pub fn with_ledger(ledger: Ledger, cookie: SessionCookie) -> Self {
        Self {
            ledger,
            cookie: Arc::new(cookie),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// List the caller's transactions in insertion order.
pub async fn list_transactions(
    State(state): State<AppState>,
    ActiveSession(session): ActiveSession,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    let transactions = state.ledger.list_by_session(&session).await.map_err(api_error)?;
    Ok(Json(ListTransactionsResponse { transactions }))
}

/// Fetch one of the caller's transactions.
pub async fn get_transaction(
    State(state): State<AppState>,
    ActiveSession(session): ActiveSession,
    Path(id): Path<String>,
) -> Result<Json<GetTransactionResponse>, ApiError> {
    let transaction = state.ledger.get_one(&session, &id).await.map_err(api_error)?;
    Ok(Json(GetTransactionResponse { transaction }))
}

/// Balance of the caller's session.
pub async fn transaction_summary(
    State(state): State<AppState>,
    ActiveSession(session): ActiveSession,
) -> Result<Json<SummaryResponse>, ApiError> {
    let amount = state.ledger.sum_by_session(&session).await.map_err(api_error)?;
    Ok(Json(SummaryResponse {
        summary: Summary { amount },
    }))
}

/// Record a transaction, minting a session identity if the caller has none.
pub async fn create_transaction(
    State(state): State<AppState>,
    CallerSession(caller): CallerSession,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|e| api_error(LedgerError::validation(e.body_text())))?;

    let set_cookie = if caller.is_new {
        let value = HeaderValue::from_str(&state.cookie.set_cookie_value(&caller.id))
            .map_err(|e| api_error(LedgerError::Internal(e.to_string())))?;
        Some(value)
    } else {
        None
    };

    let transaction = state
        .ledger
        .append(&caller.id, req.into())
        .await
        .map_err(api_error)?;

    let mut response = StatusCode::CREATED.into_response();
    if let Some(cookie) = set_cookie {
        response.headers_mut().insert(SET_COOKIE, cookie);
        info!(transaction = %transaction.id, "new session started");
    }

    Ok(response)
}
