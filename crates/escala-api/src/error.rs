//! [`ApiError`] and how it is rendered to clients.
//!
//! Every failure leaves the API as `{"error": "<message>"}` with a status
//! code matching the variant. Store failures are logged in full and reported
//! to the client without their internals.

use axum::{
  Json,
  http::{HeaderValue, StatusCode},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// A ministry or exception the request names does not exist.
  #[error("{0}")]
  NotFound(String),

  /// The request was understood but its content is unusable.
  #[error("{0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The response itself could not be put together.
  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// A header value built from text the handler computed.
pub fn header_value(text: &str) -> Result<HeaderValue, ApiError> {
  HeaderValue::from_str(text).map_err(|e| ApiError::Internal(format!("header {text:?}: {e}")))
}

impl From<escala_core::Error> for ApiError {
  fn from(e: escala_core::Error) -> Self {
    use escala_core::Error as E;
    match e {
      E::MinistryNotFound(id) => Self::NotFound(format!("ministry {id} not found")),
      E::LastMinistry | E::InvalidDocument(_) | E::InvalidDate(_) => {
        Self::BadRequest(e.to_string())
      }
      E::Serialization(_) | E::Store(_) => Self::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      Self::Store(source) => {
        tracing::error!(error = %source, "store failure while handling request");
        "internal store error".to_owned()
      }
      Self::Internal(detail) => {
        tracing::error!(%detail, "failed to build response");
        "internal error".to_owned()
      }
      other => other.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
