//! Error types for `escala-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("ministry not found: {0}")]
  MinistryNotFound(Uuid),

  #[error("cannot remove the last ministry in the rotation")]
  LastMinistry,

  #[error("invalid document: {0}")]
  InvalidDocument(String),

  #[error("invalid date: {0}")]
  InvalidDate(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
