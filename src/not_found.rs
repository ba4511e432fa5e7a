//! The response for routes that do not exist.

use axum::{
    Json,
    extract::OriginalUri,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Fallback route handler for any path the router does not know about.
pub async fn get_404_not_found(OriginalUri(uri): OriginalUri) -> Response {
    tracing::debug!("No route for {uri}");

    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": format!("The route {} does not exist", uri.path()),
        })),
    )
        .into_response()
}
