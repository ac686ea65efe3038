//! Conversions between domain values and the plain-text columns stored in
//! SQLite. Timestamps are RFC 3339 strings; documents are compact JSON.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::Result;

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn encode_document(value: &Value) -> Result<String> { Ok(serde_json::to_string(value)?) }

/// Decode a stored document. Text that is no longer valid JSON reads as
/// absent, the same as a key that was never written.
pub fn decode_document(key: &str, raw: &str) -> Option<Value> {
  match serde_json::from_str(raw) {
    Ok(value) => Some(value),
    Err(e) => {
      tracing::warn!(key, error = %e, "stored document is not valid JSON; treating as absent");
      None
    }
  }
}
