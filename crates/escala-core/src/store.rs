//! The `KeyValueStore` trait and the persistence helpers built on it.
//!
//! The application keeps exactly two documents: the schedule configuration
//! and the exception collection, each under a fixed key. Backends (e.g.
//! `escala-store-sqlite`) only move opaque JSON documents; decoding and
//! the tolerance for malformed data live here.

use std::{
  collections::BTreeMap,
  convert::Infallible,
  future::Future,
  sync::{Arc, Mutex, PoisonError},
};

use serde_json::Value;

use crate::{
  Error, Result,
  config::{PartialConfig, ScheduleConfig},
  event::ExceptionEvent,
  exceptions::exceptions_from_value,
};

pub const CONFIG_KEY: &str = "appescalas-config";
pub const EXCEPTIONS_KEY: &str = "appescalas-exceptions";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a document store keyed by string.
///
/// All methods return `Send` futures so the trait can be used behind a
/// multi-threaded runtime (e.g. tokio with `axum`).
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The document stored under `key`, or `None` if there is none.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send + 'a;

  /// Store `value` under `key`, replacing any previous document.
  fn set<'a>(
    &'a self,
    key: &'a str,
    value: Value,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

fn store_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Decode whatever is stored under [`CONFIG_KEY`].
///
/// Nothing stored, or something that does not decode, yields the defaults.
/// Also returns the normalised document when it differs from the stored one.
async fn read_config<S: KeyValueStore>(store: &S) -> Result<(ScheduleConfig, Option<Value>)> {
  let raw = store.get(CONFIG_KEY).await.map_err(store_error)?;

  let config = match &raw {
    None => ScheduleConfig::default(),
    Some(value) => match serde_json::from_value::<PartialConfig>(value.clone()) {
      Ok(partial) => ScheduleConfig::from_partial(partial),
      Err(e) => {
        tracing::warn!(error = %e, "stored configuration is malformed; using defaults");
        ScheduleConfig::default()
      }
    },
  };

  let normalized = serde_json::to_value(&config)?;
  let stale = (raw.as_ref() != Some(&normalized)).then_some(normalized);
  Ok((config, stale))
}

/// Load the schedule configuration without touching the store.
///
/// When nothing usable is stored the defaults come back with freshly
/// generated ministry ids, so two calls may disagree on ids until
/// [`load_or_init_config`] has run once.
pub async fn load_config<S: KeyValueStore>(store: &S) -> Result<ScheduleConfig> {
  Ok(read_config(store).await?.0)
}

/// Load the schedule configuration, writing the normalised form back when it
/// differs from what was stored. After the first call generated ministry ids
/// are fixed.
///
/// This is a read-modify-write: callers sharing a store must serialise it
/// with their other writes.
pub async fn load_or_init_config<S: KeyValueStore>(store: &S) -> Result<ScheduleConfig> {
  let (config, stale) = read_config(store).await?;
  if let Some(normalized) = stale {
    tracing::debug!("writing normalised configuration back to the store");
    store.set(CONFIG_KEY, normalized).await.map_err(store_error)?;
  }
  Ok(config)
}

pub async fn save_config<S: KeyValueStore>(store: &S, config: &ScheduleConfig) -> Result<()> {
  let value = serde_json::to_value(config)?;
  store.set(CONFIG_KEY, value).await.map_err(store_error)
}

// ─── Exceptions ──────────────────────────────────────────────────────────────

/// Load the exception collection, dropping malformed entries.
pub async fn load_exceptions<S: KeyValueStore>(store: &S) -> Result<Vec<ExceptionEvent>> {
  let raw = store.get(EXCEPTIONS_KEY).await.map_err(store_error)?;
  Ok(raw.as_ref().map(exceptions_from_value).unwrap_or_default())
}

pub async fn save_exceptions<S: KeyValueStore>(
  store: &S,
  exceptions: &[ExceptionEvent],
) -> Result<()> {
  let value = serde_json::to_value(exceptions)?;
  store.set(EXCEPTIONS_KEY, value).await.map_err(store_error)
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// A [`KeyValueStore`] that lives only as long as the process.
///
/// Cloning is cheap; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

impl KeyValueStore for MemoryStore {
  type Error = Infallible;

  async fn get(&self, key: &str) -> Result<Option<Value>, Infallible> {
    let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(entries.get(key).cloned())
  }

  async fn set(&self, key: &str, value: Value) -> Result<(), Infallible> {
    let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
    entries.insert(key.to_owned(), value);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::{event::EventKind, weekday::Weekday};

  #[tokio::test]
  async fn plain_load_never_writes() {
    let store = MemoryStore::new();
    let config = load_config(&store).await.unwrap();
    assert_eq!(config.year, 2026);
    assert!(store.get(CONFIG_KEY).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn init_persists_defaults_once() {
    let store = MemoryStore::new();
    let first = load_or_init_config(&store).await.unwrap();
    assert!(store.get(CONFIG_KEY).await.unwrap().is_some());

    let second = load_or_init_config(&store).await.unwrap();
    assert_eq!(first, second, "ministry ids must be stable across loads");
    assert_eq!(load_config(&store).await.unwrap(), first);
  }

  /// Holds each read of [`CONFIG_KEY`] until as many reads as the barrier
  /// counts have fetched their value.
  struct GatedStore {
    inner: MemoryStore,
    gate:  tokio::sync::Barrier,
  }

  impl KeyValueStore for GatedStore {
    type Error = Infallible;

    async fn get(&self, key: &str) -> Result<Option<Value>, Infallible> {
      let value = self.inner.get(key).await?;
      if key == CONFIG_KEY {
        self.gate.wait().await;
      }
      Ok(value)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), Infallible> {
      self.inner.set(key, value).await
    }
  }

  #[tokio::test]
  async fn concurrent_plain_loads_leave_the_store_alone() {
    let store = GatedStore {
      inner: MemoryStore::new(),
      gate:  tokio::sync::Barrier::new(2),
    };
    store.inner.set(CONFIG_KEY, json!({ "year": 2027 })).await.unwrap();

    let (a, b) = tokio::join!(load_config(&store), load_config(&store));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.year, 2027);
    assert_eq!(b.year, 2027);
    assert_eq!(
      store.inner.get(CONFIG_KEY).await.unwrap(),
      Some(json!({ "year": 2027 })),
      "reads must not rewrite the stored document"
    );
  }

  #[tokio::test]
  async fn malformed_config_falls_back_to_defaults() {
    let store = MemoryStore::new();
    store.set(CONFIG_KEY, json!("not a config")).await.unwrap();
    let config = load_config(&store).await.unwrap();
    assert_eq!(config.active_weekdays, [Weekday::Dom, Weekday::Ter, Weekday::Qui]);
  }

  #[tokio::test]
  async fn partial_config_is_completed() {
    let store = MemoryStore::new();
    store
      .set(CONFIG_KEY, json!({ "year": 2030, "ministries": ["Só um"] }))
      .await
      .unwrap();
    let config = load_or_init_config(&store).await.unwrap();
    assert_eq!(config.year, 2030);
    assert_eq!(config.ministries.len(), 1);
    assert_eq!(config.ministries[0].name, "Só um");

    let again = load_config(&store).await.unwrap();
    assert_eq!(again.ministries[0].id, config.ministries[0].id);
  }

  #[tokio::test]
  async fn saved_config_round_trips() {
    let store = MemoryStore::new();
    let mut config = ScheduleConfig::default();
    config.set_year(2028);
    config.toggle_weekday(Weekday::Sab);
    save_config(&store, &config).await.unwrap();
    assert_eq!(load_config(&store).await.unwrap(), config);
  }

  #[tokio::test]
  async fn exceptions_round_trip_and_filter() {
    let store = MemoryStore::new();
    assert!(load_exceptions(&store).await.unwrap().is_empty());

    let list = vec![ExceptionEvent::new("2026-01-04", "A", EventKind::Extra).with_note("n")];
    save_exceptions(&store, &list).await.unwrap();
    assert_eq!(load_exceptions(&store).await.unwrap(), list);

    store
      .set(EXCEPTIONS_KEY, json!([{ "date": "2026-01-04" }, { "date": "2026-01-06", "ministryName": "B" }]))
      .await
      .unwrap();
    let loaded = load_exceptions(&store).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].ministry_name, "B");
  }
}
