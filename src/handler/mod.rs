pub mod order;

use axum::{
    Json,
    http::{StatusCode, header},
    response::IntoResponse,
};

/// Liveness only, the database and messaging provider are not consulted.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = serde_json::Value, example = json!({"status": "healthy"})),
    )
)]
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(serde_json::json!
        ({
            "status": "healthy"
        })),
    )
}
