use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Liveness probe. Always 200; the response must never be cached.
pub async fn health() -> Response {
    (StatusCode::OK, [(header::CACHE_CONTROL, "no-store")], "ok").into_response()
}
