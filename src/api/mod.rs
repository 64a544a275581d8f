//! HTTP API for session-ledger.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /transactions` - List the session's transactions
//! - `GET /transactions/summary` - Session balance
//! - `GET /transactions/{id}` - One transaction of the session
//! - `POST /transactions` - Record a transaction (starts a session if needed)
//!
//! Every route under `/transactions` except `POST` answers `401` when the
//! request carries no session cookie.
//!
//! ## Example
//!
//! ```no_run
//! use session_ledger::api::{serve, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> session_ledger::Result<()> {
//!     let config = ServerConfig::new("127.0.0.1", 3000);
//!     serve(config).await
//! }
//! ```

pub mod handlers;
pub mod router;
pub mod session;
pub mod types;

pub use handlers::AppState;
pub use router::{create_router, create_router_with_state, serve, serve_with_state, ServerConfig};
pub use session::{ActiveSession, CallerSession, SessionCookie, DEFAULT_COOKIE_NAME};
pub use types::{
    CreateTransactionRequest, ErrorResponse, GetTransactionResponse, ListTransactionsResponse,
    Summary, SummaryResponse,
};
