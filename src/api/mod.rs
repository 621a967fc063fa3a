mod errors;
mod handlers;
#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

use crate::storage::SqliteStore;

pub use errors::ApiError;

/// Shared state for the read-only API.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<SqliteStore>>
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self { store: Arc::new(Mutex::new(store)) }
    }
}

fn purchase_routes() -> Router<AppState> {
    //NOTE: Static segments win over the `{order_id}` capture in axum's matcher
    Router::new()
        .route("/", get(handlers::list_purchases))
        .route("/stats/summary", get(handlers::summary_stats))
        .route("/export", get(handlers::export_purchases))
        .route("/{order_id}", get(handlers::get_purchase))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/purchases/", get(handlers::list_purchases))
        .nest("/api/purchases", purchase_routes())
        .with_state(state)
}

/// Serves the API until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;

    info!("Purchase Tracker API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
