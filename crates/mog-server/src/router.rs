use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use mog_protocol::endpoints;

use crate::dispatcher::Dispatcher;
use crate::handler;

/// Build the axum router with all media server endpoints.
pub fn build_router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(endpoints::RPC, post(handler::rpc_handler))
        .route(endpoints::RPC_BINARY, post(handler::rpc_binary_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}
