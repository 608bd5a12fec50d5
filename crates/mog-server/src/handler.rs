use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use serde_json::json;
use tracing::warn;

use mog_protocol::{HealthResponse, Request, Response, RpcCodec};

use crate::dispatcher::Dispatcher;

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(dispatcher): State<Arc<Dispatcher>>) -> Json<serde_json::Value> {
    let registry = dispatcher.lifecycle().registry();
    Json(json!({
        "name": "mog-server",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol_version": dispatcher.get_version(),
        "live_objects": registry.len(),
        "event_subscribers": dispatcher.lifecycle().events().subscriber_count(),
    }))
}

/// JSON RPC: one [`Request`] in, one [`Response`] out.
pub async fn rpc_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    Json(request): Json<Request>,
) -> Json<Response> {
    Json(dispatcher.handle(request))
}

/// Binary RPC using [`RpcCodec`] framing on both directions.
pub async fn rpc_binary_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    body: Bytes,
) -> impl IntoResponse {
    let request: Request = match RpcCodec::decode(&body) {
        Ok((request, _)) => request,
        Err(e) => {
            warn!(error = %e, "rejected malformed binary request");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    let response: Response = dispatcher.handle(request);
    match RpcCodec::encode(&response) {
        Ok(frame) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            frame,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
