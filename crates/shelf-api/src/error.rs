//! API error type and its JSON response encoding.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error produced while handling an API request.
///
/// Every store error maps onto one of these via [`From`], so handlers
/// can use plain `?` and still answer with the right status code.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The addressed record does not exist.
  #[error("not found: {0}")]
  NotFound(String),

  /// The request was well-formed HTTP but the payload was rejected.
  #[error("bad request: {0}")]
  BadRequest(String),

  /// The store itself failed.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<shelf_core::Error> for ApiError {
  fn from(err: shelf_core::Error) -> Self {
    use shelf_core::Error as E;

    match err {
      E::NotFound(_) | E::UrlNotFound(_) => {
        ApiError::NotFound(err.to_string())
      }
      E::Validation(_) | E::TitleTaken(_) | E::UrlTaken(_) | E::Format(_) => {
        ApiError::BadRequest(err.to_string())
      }
      E::Storage(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error while handling request");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };

    (status, Json(json!({ "error": message }))).into_response()
  }
}
