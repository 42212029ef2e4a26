//! Route handlers and the JSON envelopes they speak.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiError;

/// Body of `POST /api/chat`. A missing or `null` `query` reads as blank.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Success envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Error envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

/// Ask a freshly started engine one question.
///
/// The body is decoded by hand so a missing or wrong `Content-Type` header
/// does not change the outcome.
pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let request: ChatRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::MalformedBody)?;
    let query = request.query.unwrap_or_default();

    if query.trim().is_empty() {
        return Err(ApiError::MissingQuery);
    }

    let mut engine = state.engines.start();
    let response = engine
        .ask(&query)
        .await
        .map_err(|e| ApiError::Engine(format!("{e:#}")))?;

    Ok(Json(ChatResponse { response }))
}

/// Any method other than POST on the chat route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
