//! Route table for the event gateway.

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{healthz, receive_event, AppState};

/// Builds the gateway router with tracing middleware.
pub fn gateway_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(receive_event))
        .route("/healthz", get(healthz))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
