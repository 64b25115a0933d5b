use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// `{status: true, message, data}` success body used by every handler.
pub fn success<T: Serialize>(code: StatusCode, message: &str, data: T) -> Response {
    (
        code,
        Json(serde_json::json!({
            "status": true,
            "message": message,
            "data": data,
        })),
    )
        .into_response()
}

/// `{status: false, message}` failure body; the counterpart lives in the
/// `IntoResponse` impl for `AppError`.
pub fn failure(code: StatusCode, message: &str) -> Response {
    (
        code,
        Json(serde_json::json!({
            "status": false,
            "message": message,
        })),
    )
        .into_response()
}
