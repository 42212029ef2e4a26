//! Gateway error type and its HTTP rendering.
//!
//! Validation and engine failures never escape the gateway: each one maps
//! to a fixed status code and body here.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::handlers::ErrorEnvelope;
use crate::consts::MISSING_QUERY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 400, plain text. The body was not a JSON object with a string `query`.
    MalformedBody,
    /// 400, JSON envelope. The query was blank after trimming.
    MissingQuery,
    /// 405, plain text.
    MethodNotAllowed,
    /// 500, JSON envelope carrying the engine's message.
    Engine(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MalformedBody => (StatusCode::BAD_REQUEST, "Bad request").into_response(),
            ApiError::MissingQuery => envelope(StatusCode::BAD_REQUEST, MISSING_QUERY.to_string()),
            ApiError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response()
            }
            ApiError::Engine(message) => {
                tracing::warn!(error = %message, "engine failed");
                envelope(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

fn envelope(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorEnvelope { error })).into_response()
}
