//! Development Store API
//!
//! An in-memory stand-in for the store backend, built with Axum. It serves
//! exactly the routes the panel calls, so the panel can be run and tested
//! without the real service.
//!
//! # Endpoints
//!
//! - `POST /api/auth/login` - Exchange credentials for a bearer token
//! - `GET /api/auth/me` - Account owning the token
//! - `GET /api/products` - List products
//! - `POST /api/products` - Create a product (admin)
//! - `PUT /api/products/:id` - Update a product (admin)
//! - `DELETE /api/products/:id` - Delete a product (admin)
//! - `GET /api/stats` - Dashboard aggregates (admin)
//! - `GET /health` - Liveness probe
//!
//! Errors answer `{"message": "..."}` with 400, 401, 403 or 404.

pub mod error;
pub mod routes;
pub mod state;
mod stats;

pub use error::{DevApiError, DevApiResult};
pub use state::{Account, DevState, Order, OrderItem};

use axum::{
    routing::{get, post, put},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::DevServerConfig;

/// Build the router with all routes and middleware
pub fn build_router(state: DevState) -> Router {
    let api_routes = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/products",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route(
            "/products/:id",
            put(routes::products::update_product).delete(routes::products::delete_product),
        )
        .route("/stats", get(routes::stats::get_stats));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Bind to the configured address and serve until Ctrl+C or SIGTERM
pub async fn serve(state: DevState, config: &DevServerConfig) -> DevApiResult<()> {
    let listener = TcpListener::bind(config.addr()).await?;
    run(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` completes
pub async fn run(
    listener: TcpListener,
    state: DevState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> DevApiResult<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Development API listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| DevApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Development API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
