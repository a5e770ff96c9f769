use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::warn;

use crate::router::CompletionResult;

/// `{"error": message}` with the given status
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Log a rejected request body and answer with the rejection's own status
/// (400 for bad JSON, 415 for a missing JSON content type, 422 for a non-object)
pub fn rejected_body(rejection: JsonRejection) -> Response {
    let status = rejection.status();
    let message = rejection.body_text();
    warn!(%status, "Rejected request body: {}", message);
    error_response(status, message)
}

/// `200 {"answer"}` on success, `500 {"error"}` on failure
pub fn completion_response(result: CompletionResult) -> Response {
    match result {
        CompletionResult::Success { text } => Json(json!({ "answer": text })).into_response(),
        CompletionResult::Failure { message, .. } => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}
