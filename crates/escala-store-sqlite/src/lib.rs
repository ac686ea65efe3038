//! SQLite backend for escala's [`KeyValueStore`].
//!
//! Each key maps to one row holding a JSON document and the time it was last
//! written. Queries run on the [`tokio_rusqlite`] connection thread, never on
//! the async runtime.
//!
//! [`KeyValueStore`]: escala_core::store::KeyValueStore

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
