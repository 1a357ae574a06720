//! HTTP API over the query engine
//!
//! | Route            | Params                             |
//! |------------------|------------------------------------|
//! | `/rates`         | `date`                             |
//! | `/convert`       | `date`, `source`, `target`, `amount` |
//! | `/highest_rate`  | `start_date`, `end_date`, `currency` |
//! | `/average_rate`  | `start_date`, `end_date`, `currency` |
//!
//! A found result is `200` with a JSON body, missing data is `204`, and an
//! end date before the start date is `422` with a message.

pub mod handlers;
pub mod requests;

use crate::error::Result;
use crate::rates::QueryEngine;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;

pub mod urls {
    pub const RATES: &str = "/rates";
    pub const CONVERT: &str = "/convert";
    pub const HIGHEST_RATE: &str = "/highest_rate";
    pub const AVERAGE_RATE: &str = "/average_rate";
}

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: QueryEngine,
}

impl AppState {
    pub fn new(engine: QueryEngine) -> Self {
        Self { engine }
    }
}

/// Build the API router
pub fn router(engine: QueryEngine) -> Router {
    Router::new()
        .route(urls::RATES, get(handlers::rates))
        .route(urls::CONVERT, get(handlers::convert))
        .route(urls::HIGHEST_RATE, get(handlers::highest_rate))
        .route(urls::AVERAGE_RATE, get(handlers::average_rate))
        .with_state(AppState::new(engine))
}

/// Serve the API until Ctrl-C
pub async fn serve(engine: QueryEngine, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Serving exchange rates on http://{}", listener.local_addr()?);

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
