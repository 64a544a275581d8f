//! API router configuration.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_transaction, get_transaction, health, list_transactions, transaction_summary, AppState,
};

/// Create the API router backed by an in-memory ledger.
pub fn create_router() -> Router {
    create_router_with_state(AppState::new())
}

/// Create the API router with custom state.
pub fn create_router_with_state(state: AppState) -> Router {
    // `/summary` is a static segment, so it wins over `/{id}`
    let transaction_routes = Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/summary", get(transaction_summary))
        .route("/{id}", get(get_transaction));

    Router::new()
        .route("/health", get(health))
        .nest("/transactions", transaction_routes)
        // A nested "/" only matches the bare prefix
        .route(
            "/transactions/",
            get(list_transactions).post(create_transaction),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Stop accepting connections on Ctrl-C and drain in-flight requests.
    pub graceful_shutdown: bool,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            graceful_shutdown: true,
        }
    }

    pub fn without_graceful_shutdown(mut self) -> Self {
        self.graceful_shutdown = false;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 3000)
    }
}

/// Start the API server with an in-memory ledger.
pub async fn serve(config: ServerConfig) -> crate::Result<()> {
    serve_with_state(config, AppState::new()).await
}

/// Start the API server with custom state.
pub async fn serve_with_state(config: ServerConfig, state: AppState) -> crate::Result<()> {
    let addr = config.bind_address();
    let router = create_router_with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(crate::error::LedgerError::Io)?;

    tracing::info!("Starting session-ledger API server on {}", addr);

    let server = axum::serve(listener, router);
    if config.graceful_shutdown {
        server.with_graceful_shutdown(shutdown_signal()).await?;
    } else {
        server.await?;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
