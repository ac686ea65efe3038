//! ETag computation for merged schedules.
//!
//! The tag is a SHA-256 over the schedule's fields in order. Since
//! [`crate::generate`] and [`crate::merge`] are deterministic, equal inputs
//! always produce equal tags, which is what lets clients cache a schedule.

use sha2::{Digest, Sha256};

use crate::event::{EventKind, ScheduleEvent};

/// Compute a quoted ETag for `events`.
pub fn schedule_etag(events: &[ScheduleEvent]) -> String {
  let mut hasher = Sha256::new();
  for event in events {
    // Length prefixes keep field boundaries unambiguous.
    for field in [
      event.date.as_str(),
      event.weekday.map_or("", |d| d.code()),
      event.ministry_name.as_str(),
      match event.kind {
        EventKind::Regular => "regular",
        EventKind::Extra => "extra",
      },
      event.note.as_deref().unwrap_or(""),
    ] {
      hasher.update((field.len() as u64).to_le_bytes());
      hasher.update(field.as_bytes());
    }
    hasher.update([u8::from(event.note.is_some())]);
  }
  let hash = hasher.finalize();
  format!("\"{}\"", hex::encode(hash))
}
