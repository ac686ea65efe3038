//! Handlers for `/exceptions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/exceptions` | Stored overrides, in insertion order |
//! | `PUT`    | `/exceptions/{date}` | Body: `{"ministryName":"...","type":"regular\|extra","note":"..."}` |
//! | `DELETE` | `/exceptions/{date}` | 204, or 404 when nothing is stored for that date |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use escala_core::{
  date::{format_date, parse_date},
  event::{EventKind, ExceptionEvent},
  exceptions::{remove_exception, upsert_exception},
  store::{KeyValueStore, load_exceptions, save_exceptions},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

fn canonical_date(raw: &str) -> Result<String, ApiError> {
  parse_date(raw)
    .map(format_date)
    .ok_or_else(|| ApiError::BadRequest(format!("invalid date: {raw}")))
}

/// `GET /exceptions`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<ExceptionEvent>>, ApiError>
where
  S: KeyValueStore,
{
  Ok(Json(load_exceptions(state.store.as_ref()).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBody {
  pub ministry_name: String,
  #[serde(rename = "type", default)]
  pub kind:          EventKind,
  pub note:          Option<String>,
}

/// `PUT /exceptions/{date}`
pub async fn upsert<S>(
  State(state): State<ApiState<S>>,
  Path(date): Path<String>,
  Json(body): Json<UpsertBody>,
) -> Result<Json<ExceptionEvent>, ApiError>
where
  S: KeyValueStore,
{
  let date = canonical_date(&date)?;
  let name = body.ministry_name.trim();
  if name.is_empty() {
    return Err(ApiError::BadRequest("ministryName must not be blank".into()));
  }

  let mut exception = ExceptionEvent::new(date, name, body.kind);
  if let Some(note) = body.note.filter(|n| !n.trim().is_empty()) {
    exception = exception.with_note(note);
  }

  let _guard = state.write_lock.lock().await;
  let mut exceptions = load_exceptions(state.store.as_ref()).await?;
  upsert_exception(&mut exceptions, exception.clone());
  save_exceptions(state.store.as_ref(), &exceptions).await?;

  tracing::info!(date = %exception.date, ministry = %exception.ministry_name, "exception saved");
  Ok(Json(exception))
}

/// `DELETE /exceptions/{date}`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(date): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: KeyValueStore,
{
  let date = canonical_date(&date)?;

  let _guard = state.write_lock.lock().await;
  let mut exceptions = load_exceptions(state.store.as_ref()).await?;
  if !remove_exception(&mut exceptions, &date) {
    return Err(ApiError::NotFound(format!("no exception on {date}")));
  }
  save_exceptions(state.store.as_ref(), &exceptions).await?;

  tracing::info!(%date, "exception removed");
  Ok(StatusCode::NO_CONTENT)
}
