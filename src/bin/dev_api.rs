//! Development Store API
//!
//! Run with: cargo run --bin storeadmin-dev-api
//!
//! # Configuration
//!
//! Read from the standard config locations, then environment variables:
//! - `STOREADMIN_DEV_HOST`: Host to bind to (default: 127.0.0.1)
//! - `STOREADMIN_DEV_PORT`: Port to listen on (default: 5000)
//! - `STOREADMIN_LOG_LEVEL`, `STOREADMIN_LOG_FORMAT`, `RUST_LOG`: logging

use storeadmin::config::Config;
use storeadmin::devserver::{self, state, DevState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    storeadmin::logging::init(&config.logging);

    tracing::info!("Starting development store API v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Seeded admin: {} / customer: {}",
        config.devserver.admin_email,
        state::CUSTOMER_EMAIL
    );

    let state = DevState::seeded(&config.devserver);
    devserver::serve(state, &config.devserver).await?;

    Ok(())
}
