use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn home() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"message": "Vehicle registry API. POST /login to get a token."})),
    )
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
