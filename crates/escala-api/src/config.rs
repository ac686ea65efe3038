//! Handlers for `/config` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/config` | Normalised config; defaults when nothing is stored |
//! | `PUT`    | `/config` | Body: partial config, completed with defaults |
//! | `POST`   | `/config/ministries` | Body: `{"name":"..."}`; appends to the rotation |
//! | `PATCH`  | `/config/ministries/{id}` | Body: `{"name":"..."}` |
//! | `DELETE` | `/config/ministries/{id}` | 400 when it is the last one |
//! | `POST`   | `/config/ministries/{id}/move` | Body: `{"direction":"up\|down"}` |
//! | `POST`   | `/config/weekdays/{code}/toggle` | `code` is `DOM`..`SAB`, any case |
//!
//! Every mutating handler answers with the full config as it now stands.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use escala_core::{
  config::{Direction, PartialConfig, ScheduleConfig},
  store::{KeyValueStore, load_or_init_config, save_config},
  weekday::Weekday,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// Load, edit and save the config under the write lock.
async fn edit<S, T>(
  state: &ApiState<S>,
  f: impl FnOnce(&mut ScheduleConfig) -> Result<T, ApiError>,
) -> Result<(ScheduleConfig, T), ApiError>
where
  S: KeyValueStore,
{
  let _guard = state.write_lock.lock().await;
  let mut config = load_or_init_config(state.store.as_ref()).await?;
  let out = f(&mut config)?;
  save_config(state.store.as_ref(), &config).await?;
  Ok((config, out))
}

// ─── Whole config ─────────────────────────────────────────────────────────────

/// `GET /config`
pub async fn get_one<S>(State(state): State<ApiState<S>>) -> Result<Json<ScheduleConfig>, ApiError>
where
  S: KeyValueStore,
{
  Ok(Json(state.config().await?))
}

/// `PUT /config`
pub async fn replace<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<PartialConfig>,
) -> Result<Json<ScheduleConfig>, ApiError>
where
  S: KeyValueStore,
{
  let config = ScheduleConfig::from_partial(body);
  let _guard = state.write_lock.lock().await;
  save_config(state.store.as_ref(), &config).await?;
  tracing::info!(year = config.year, ministries = config.ministries.len(), "config replaced");
  Ok(Json(config))
}

// ─── Ministries ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct NameBody {
  #[serde(default)]
  pub name: String,
}

/// `POST /config/ministries`
pub async fn add_ministry<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: KeyValueStore,
{
  let (config, id) = edit(&state, |c| Ok(c.add_ministry(&body.name))).await?;
  tracing::info!(%id, "ministry added");
  Ok((StatusCode::CREATED, Json(config)))
}

/// `PATCH /config/ministries/{id}`
pub async fn rename_ministry<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NameBody>,
) -> Result<Json<ScheduleConfig>, ApiError>
where
  S: KeyValueStore,
{
  let (config, ()) = edit(&state, |c| Ok(c.rename_ministry(id, &body.name)?)).await?;
  tracing::info!(%id, "ministry renamed");
  Ok(Json(config))
}

#[derive(Debug, Deserialize)]
pub struct MoveBody {
  pub direction: Direction,
}

/// `POST /config/ministries/{id}/move`
pub async fn move_ministry<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<MoveBody>,
) -> Result<Json<ScheduleConfig>, ApiError>
where
  S: KeyValueStore,
{
  let (config, ()) = edit(&state, |c| Ok(c.move_ministry(id, body.direction)?)).await?;
  tracing::info!(%id, direction = ?body.direction, "ministry moved");
  Ok(Json(config))
}

/// `DELETE /config/ministries/{id}`
pub async fn remove_ministry<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ScheduleConfig>, ApiError>
where
  S: KeyValueStore,
{
  let (config, removed) = edit(&state, |c| Ok(c.remove_ministry(id)?)).await?;
  tracing::info!(%id, name = %removed.name, "ministry removed");
  Ok(Json(config))
}

// ─── Weekdays ─────────────────────────────────────────────────────────────────

/// `POST /config/weekdays/{code}/toggle`
pub async fn toggle_weekday<S>(
  State(state): State<ApiState<S>>,
  Path(code): Path<String>,
) -> Result<Json<ScheduleConfig>, ApiError>
where
  S: KeyValueStore,
{
  let day: Weekday = code
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("unknown weekday code: {code}")))?;
  let (config, active) = edit(&state, |c| Ok(c.toggle_weekday(day))).await?;
  tracing::info!(weekday = %day, active, "weekday toggled");
  Ok(Json(config))
}
