//! # Tickercorr Web
//!
//! axum routes over [`tickercorr_core::QueryService`].
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /stocks/ticker` | [`handlers::ticker_average`] |
//! | `GET /stocks/stockcorrelation` | [`handlers::stock_correlation`] |
//! | `GET /health` | [`handlers::health`] |
//!
//! Failures are returned as `{ "error": "..." }` with 400 for invalid input,
//! 404 when no data exists and 502 when the provider failed or returned
//! series that cannot be paired.

pub mod config;
pub mod error;
pub mod handlers;

use axum::routing::get;
use axum::Router;
use tickercorr_core::QueryService;
use tracing::info;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody, ServerError};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: QueryService,
}

impl AppState {
    pub fn new(service: QueryService) -> Self {
        Self { service }
    }
}

/// Build the router with CORS applied.
pub fn router(state: AppState, config: &ServerConfig) -> Result<Router, ServerError> {
    Ok(Router::new()
        .route("/stocks/ticker", get(handlers::ticker_average))
        .route("/stocks/stockcorrelation", get(handlers::stock_correlation))
        .route("/health", get(handlers::health))
        .layer(config.cors_layer()?)
        .with_state(state))
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: ServerConfig, service: QueryService) -> Result<(), ServerError> {
    let app = router(AppState::new(service), &config)?;
    let addr = config.socket_addr()?;

    info!("Registering routes:");
    info!("  GET /stocks/ticker?ticker=NVDA&minutes=50&aggregation=average");
    info!("  GET /stocks/stockcorrelation?ticker=NVDA&ticker2=PYPL&minutes=50");
    info!("  GET /health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, origins = ?config.cors_origins, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
