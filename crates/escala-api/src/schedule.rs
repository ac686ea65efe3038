//! Handlers for the merged schedule.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/schedule` | Optional `?month=1..12`; carries an `ETag`, honours `If-None-Match` |
//! | `GET`  | `/calendar/{month}` | Sunday-first month grid |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use escala_core::{
  calendar::{MonthGrid, month_events},
  config::ScheduleConfig,
  etag::schedule_etag,
  event::ScheduleEvent,
  generate, merge,
  store::{KeyValueStore, load_exceptions},
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::{ApiError, header_value},
};

/// The stored config with the generated schedule and stored exceptions
/// merged over it.
async fn merged_schedule<S>(state: &ApiState<S>) -> Result<(ScheduleConfig, Vec<ScheduleEvent>), ApiError>
where
  S: KeyValueStore,
{
  let config = state.config().await?;
  let exceptions = load_exceptions(state.store.as_ref()).await?;
  let events = merge(&generate(&config), &exceptions);
  tracing::debug!(year = config.year, events = events.len(), "schedule merged");
  Ok((config, events))
}

fn check_month(month: u32) -> Result<u32, ApiError> {
  if (1..=12).contains(&month) {
    Ok(month)
  } else {
    Err(ApiError::BadRequest(format!("month must be between 1 and 12, got {month}")))
  }
}

fn strip_etag(tag: &str) -> &str {
  let tag = tag.trim();
  let tag = tag.strip_prefix("W/").unwrap_or(tag);
  tag.trim_matches('"')
}

/// Whether an `If-None-Match` value matches `etag`.
fn none_match_hits(header: &str, etag: &str) -> bool {
  header
    .split(',')
    .any(|candidate| candidate.trim() == "*" || strip_etag(candidate) == strip_etag(etag))
}

// ─── Schedule ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScheduleParams {
  pub month: Option<u32>,
}

/// `GET /schedule[?month=<1..12>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ScheduleParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: KeyValueStore,
{
  let month = params.month.map(check_month).transpose()?;
  let (_, events) = merged_schedule(&state).await?;
  let events = match month {
    Some(m) => month_events(&events, m),
    None => events,
  };

  let etag = schedule_etag(&events);
  let fresh = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| none_match_hits(v, &etag));

  let etag_value = header_value(&etag)?;

  if fresh {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag_value)]).into_response());
  }
  Ok(([(header::ETAG, etag_value)], Json(events)).into_response())
}

// ─── Calendar ─────────────────────────────────────────────────────────────────

/// `GET /calendar/{month}`
pub async fn calendar<S>(
  State(state): State<ApiState<S>>,
  Path(month): Path<u32>,
) -> Result<Json<MonthGrid>, ApiError>
where
  S: KeyValueStore,
{
  let month = check_month(month)?;
  let (config, events) = merged_schedule(&state).await?;
  Ok(Json(MonthGrid::build(config.year, month, &events)?))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn none_match_accepts_quoted_bare_weak_and_star() {
    let etag = "\"abc\"";
    assert!(none_match_hits("\"abc\"", etag));
    assert!(none_match_hits("abc", etag));
    assert!(none_match_hits("W/\"abc\"", etag));
    assert!(none_match_hits("\"zzz\", \"abc\"", etag));
    assert!(none_match_hits("*", etag));
    assert!(!none_match_hits("\"abd\"", etag));
  }
}
