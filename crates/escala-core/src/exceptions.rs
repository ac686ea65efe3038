//! Editing and validating the persisted exception collection.

use serde_json::Value;

use crate::event::ExceptionEvent;

/// Insert `exception`, replacing any existing entry for the same date. The
/// new entry goes to the end, so it also wins any later merge.
pub fn upsert_exception(exceptions: &mut Vec<ExceptionEvent>, exception: ExceptionEvent) {
  exceptions.retain(|e| e.date != exception.date);
  exceptions.push(exception);
}

/// Remove the exception on `date`. Returns whether one was there.
pub fn remove_exception(exceptions: &mut Vec<ExceptionEvent>, date: &str) -> bool {
  let before = exceptions.len();
  exceptions.retain(|e| e.date != date);
  exceptions.len() != before
}

/// Decode an untrusted exception collection.
///
/// Anything but an array yields an empty list. Entries without a string
/// `date` and a string `ministryName`, or that otherwise fail to decode,
/// are dropped with a warning.
pub fn exceptions_from_value(value: &Value) -> Vec<ExceptionEvent> {
  let Some(items) = value.as_array() else {
    tracing::warn!("exception collection is not an array; ignoring it");
    return Vec::new();
  };

  items
    .iter()
    .filter_map(|item| {
      let has_fields = item.get("date").is_some_and(Value::is_string)
        && item.get("ministryName").is_some_and(Value::is_string);
      if !has_fields {
        tracing::warn!(entry = %item, "dropping exception without date or ministry name");
        return None;
      }
      match serde_json::from_value(item.clone()) {
        Ok(exception) => Some(exception),
        Err(e) => {
          tracing::warn!(entry = %item, error = %e, "dropping malformed exception");
          None
        }
      }
    })
    .collect()
}
