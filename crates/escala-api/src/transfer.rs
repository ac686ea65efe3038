//! Bulk import and export of the user's data.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/export` | `{config, exceptions}` as a download |
//! | `POST` | `/import` | Same shape; absent parts leave current data untouched |

use axum::{
  Json,
  extract::State,
  http::header,
  response::{IntoResponse, Response},
};
use escala_core::{
  document::{ScheduleDocument, export_file_name},
  store::{KeyValueStore, load_exceptions, load_or_init_config, save_config, save_exceptions},
};
use serde_json::Value;

use crate::{
  ApiState,
  error::{ApiError, header_value},
};

/// `GET /export`
pub async fn export<S>(State(state): State<ApiState<S>>) -> Result<Response, ApiError>
where
  S: KeyValueStore,
{
  let config = state.config().await?;
  let exceptions = load_exceptions(state.store.as_ref()).await?;

  let disposition = format!("attachment; filename=\"{}\"", export_file_name(config.year));
  let disposition = header_value(&disposition)?;

  let document = ScheduleDocument::new(config, exceptions);
  Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(document)).into_response())
}

/// `POST /import`
///
/// The body is read as untrusted JSON; see
/// [`ScheduleDocument::import`] for what is accepted.
pub async fn import<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<Value>,
) -> Result<Json<ScheduleDocument>, ApiError>
where
  S: KeyValueStore,
{
  let outcome = ScheduleDocument::import(&body)?;

  let _guard = state.write_lock.lock().await;
  if let Some(config) = &outcome.config {
    save_config(state.store.as_ref(), config).await?;
  }
  if let Some(exceptions) = &outcome.exceptions {
    save_exceptions(state.store.as_ref(), exceptions).await?;
  }
  tracing::info!(
    config = outcome.config.is_some(),
    exceptions = outcome.exceptions.as_ref().map(Vec::len),
    "document imported"
  );

  let config = load_or_init_config(state.store.as_ref()).await?;
  let exceptions = load_exceptions(state.store.as_ref()).await?;
  Ok(Json(ScheduleDocument::new(config, exceptions)))
}
