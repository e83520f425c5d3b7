use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;

/// Posts awaiting manual posting, enhanced first.
pub async fn api_today(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.posts.ready_posts().await {
        Ok(posts) => Json(posts).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to load ready posts");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn api_mark_posted(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match state.posts.mark_posted(uuid, Utc::now()).await {
        Ok(true) => {
            info!(id = %uuid, "Post marked as posted");
            Json(serde_json::json!({ "msg": "Success" })).into_response()
        }
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": "Post not found" })),
        )
            .into_response(),
        Err(e) => {
            warn!(id = %uuid, error = %e, "Failed to mark post as posted");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
