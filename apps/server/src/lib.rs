//! HTTP surface for Lapline: schedule, driver list and normalized race data.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::{extract::Request, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use std::future::Future;
use tracing::{info, info_span, warn};
use uuid::Uuid;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/api/schedule", get(routes::schedule))
        .route("/api/drivers", get(routes::drivers))
        .route("/api/race-data", get(routes::race_data))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
            info_span!("request", id = %Uuid::new_v4(), method = %req.method(), uri = %req.uri())
        }))
        .with_state(state)
}

/// Resolves once `signal` fires. A signal that fails to install never
/// resolves, so the server keeps running instead of shutting down at once.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutting down"),
        Err(err) => {
            warn!(%err, "Could not listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
