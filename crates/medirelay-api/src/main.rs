//! medirelay HTTP entry point.
//!
//! Parses configuration, initializes tracing and application state, then
//! serves the relay API.

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use medirelay_api::config::ServerConfig;
use medirelay_api::http;
use medirelay_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let state = AppState::init(&config)?;
    let router = http::router::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "medirelay listening");

    axum::serve(listener, router).await?;
    Ok(())
}
