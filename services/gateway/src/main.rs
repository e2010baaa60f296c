mod auth;
mod error;
mod handlers;
mod models;
mod rate_limit;
mod router;
mod state;
mod validation;

use router::create_router;
use state::{AppState, GatewayConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use store::SwapStore;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting marketplace gateway");

    let config = GatewayConfig::from_env();
    let addr: SocketAddr = config.bind_addr.parse()?;

    // One shared store behind all three engines
    let store = Arc::new(SwapStore::new());
    let state = AppState::new(store, config);

    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
