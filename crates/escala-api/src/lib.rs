//! JSON REST API for escala.
//!
//! Exposes an axum [`Router`] backed by any
//! [`escala_core::store::KeyValueStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", escala_api::api_router(store.clone()))
//! ```

pub mod config;
pub mod error;
pub mod exceptions;
pub mod schedule;
pub mod transfer;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post, put},
};
use escala_core::{
  config::ScheduleConfig,
  store::{KeyValueStore, load_or_init_config},
};
use tokio::sync::Mutex;

pub use error::ApiError;

/// Shared state threaded through all handlers.
///
/// Every handler that reads, edits and writes back a stored document holds
/// `write_lock` for the whole sequence so concurrent edits cannot drop each
/// other's changes. Reading the config counts: the first read persists the
/// defaults and their ministry ids.
pub struct ApiState<S> {
  pub store:      Arc<S>,
  pub write_lock: Arc<Mutex<()>>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      write_lock: Arc::new(Mutex::new(())),
    }
  }
}

impl<S: KeyValueStore> ApiState<S> {
  /// The stored config, initialised under the write lock on first use.
  pub async fn config(&self) -> Result<ScheduleConfig, ApiError> {
    let _guard = self.write_lock.lock().await;
    Ok(load_or_init_config(self.store.as_ref()).await?)
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      write_lock: Arc::clone(&self.write_lock),
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: KeyValueStore + 'static,
{
  Router::new()
    // Configuration
    .route("/config", get(config::get_one::<S>).put(config::replace::<S>))
    .route("/config/ministries", post(config::add_ministry::<S>))
    .route(
      "/config/ministries/{id}",
      patch(config::rename_ministry::<S>).delete(config::remove_ministry::<S>),
    )
    .route("/config/ministries/{id}/move", post(config::move_ministry::<S>))
    .route("/config/weekdays/{code}/toggle", post(config::toggle_weekday::<S>))
    // Schedule
    .route("/schedule", get(schedule::list::<S>))
    .route("/calendar/{month}", get(schedule::calendar::<S>))
    // Exceptions
    .route("/exceptions", get(exceptions::list::<S>))
    .route(
      "/exceptions/{date}",
      put(exceptions::upsert::<S>).delete(exceptions::remove::<S>),
    )
    // Import / export
    .route("/export", get(transfer::export::<S>))
    .route("/import", post(transfer::import::<S>))
    .with_state(ApiState::new(store))
}

// ─── Integration tests ────────────────────────────────────────────────────────
