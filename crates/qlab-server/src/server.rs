//! Axum server setup and routing.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/quantum/circuit/simulate", post(api::circuit::simulate))
        .route("/quantum/network/simulate", post(api::network::simulate))
        .route("/quantum/bb84/simulate", post(api::bb84::simulate))
        .route("/quantum/photonic/execute", post(api::photonic::execute_code))
        .route("/quantum/photonic/visualize", post(api::photonic::visualize))
        .route("/quantum/layout/execute", post(api::layout::execute_code));

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        // TODO: Make CORS configurable; restrict origins in production
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
