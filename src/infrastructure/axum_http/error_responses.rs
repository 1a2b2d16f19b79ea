use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Maps a use case error to a JSON error body. Internal failures are logged
/// and masked so their detail never reaches the client.
pub fn respond(status: StatusCode, err: impl std::fmt::Display + std::fmt::Debug) -> Response {
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = ?err, "request failed");
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    let body = Json(ErrorResponse {
        code: status.as_u16(),
        message,
    });

    (status, body).into_response()
}
