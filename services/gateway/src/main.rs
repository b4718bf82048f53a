mod auth;
mod config;
mod error;
mod handlers;
mod models;
mod rate_limit;
mod router;
mod state;
mod users;


use anyhow::Context;
use config::GatewayConfig;
use persistence::{JsonFileStore, StateStore};
use router::create_router;
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_tracing(config::log_json_from_env());

    let config = GatewayConfig::from_env();
    tracing::info!(data_dir = %config.data_dir.display(), "Starting auction gateway");

    let store: Arc<dyn StateStore> = Arc::new(
        JsonFileStore::open(&config.data_dir)
            .with_context(|| format!("opening data directory {}", config.data_dir.display()))?,
    );
    let state = AppState::open(store, &config).context("loading auction state")?;
    if state.users.is_empty() {
        tracing::warn!("No users configured; set AUCTION_ADMIN_USER and AUCTION_ADMIN_PASSWORD");
    }

    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
