//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure serialises to `{"error": "<message>"}`. Internal failures
//! are logged server-side and answered with a generic message only.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn reply(status: StatusCode, message: &str) -> Response {
  (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthorized => {
        let mut res = reply(StatusCode::UNAUTHORIZED, "Unauthorized");
        res
          .headers_mut()
          .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        res
      }
      ApiError::BadRequest(m) => reply(StatusCode::BAD_REQUEST, &m),
      ApiError::NotFound(m) => reply(StatusCode::NOT_FOUND, &m),
      ApiError::Conflict(m) => reply(StatusCode::CONFLICT, &m),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "unhandled store failure");
        reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
      }
    }
  }
}
