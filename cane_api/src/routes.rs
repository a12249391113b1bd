use std::sync::Arc;

use axum::{Router, http::Method, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::{route::route_handler, state::AppState, ws};

pub fn app_routes(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/route", get(route_handler))
        .route("/ws", get(ws::handler))
        .route("/health", get(|| async { "ok" }))
        .layer(ServiceBuilder::new().layer(cors_layer))
        .with_state(state)
}
