pub mod rest;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use autox_store::PostStore;

pub struct AppState {
    pub posts: Arc<dyn PostStore>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/today", get(rest::api_today))
        .route("/api/mark_posted/{id}", post(rest::api_mark_posted))
        .with_state(state)
        // Logging layer: method + path + status + latency
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
