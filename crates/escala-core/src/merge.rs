//! The override merger: lays exceptions over a generated schedule.

use std::collections::BTreeMap;

use crate::event::{ExceptionEvent, ScheduleEvent};

/// Merge `overrides` into `events` and return the result sorted by date.
///
/// Each override replaces whatever sits on its date wholesale, including
/// dates with no generated event. When several overrides share a date the
/// last one wins. Neither input is modified.
pub fn merge(events: &[ScheduleEvent], overrides: &[ExceptionEvent]) -> Vec<ScheduleEvent> {
  // Keys are `YYYY-MM-DD`, so string order is date order.
  let mut by_date: BTreeMap<&str, ScheduleEvent> = BTreeMap::new();
  for event in events {
    by_date.insert(event.date.as_str(), event.clone());
  }
  for exception in overrides {
    by_date.insert(exception.date.as_str(), ScheduleEvent::from(exception));
  }
  by_date.into_values().collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{event::EventKind, weekday::Weekday};

  fn regular(date: &str, weekday: Weekday, name: &str) -> ScheduleEvent {
    ScheduleEvent {
      date:          date.into(),
      weekday:       Some(weekday),
      ministry_name: name.into(),
      kind:          EventKind::Regular,
      note:          None,
    }
  }

  #[test]
  fn empty_overrides_only_sort() {
    let base = vec![
      regular("2026-01-11", Weekday::Dom, "B"),
      regular("2026-01-04", Weekday::Dom, "A"),
    ];
    let merged = merge(&base, &[]);
    assert_eq!(merged, vec![base[1].clone(), base[0].clone()]);
  }

  #[test]
  fn duplicate_base_dates_keep_the_last() {
    let base = vec![
      regular("2026-01-04", Weekday::Dom, "A"),
      regular("2026-01-04", Weekday::Dom, "B"),
    ];
    let merged = merge(&base, &[]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].ministry_name, "B");
  }

  #[test]
  fn override_replaces_every_field() {
    let mut base = vec![regular("2026-01-04", Weekday::Dom, "A")];
    base[0].note = Some("old note".into());
    let merged = merge(&base, &[ExceptionEvent::new("2026-01-04", "Z", EventKind::Regular)]);
    assert_eq!(merged[0].ministry_name, "Z");
    assert_eq!(merged[0].note, None);
  }

  #[test]
  fn unparseable_override_date_is_kept_without_weekday() {
    let merged = merge(&[], &[ExceptionEvent::new("soon", "Z", EventKind::Extra)]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].weekday, None);
  }
}
