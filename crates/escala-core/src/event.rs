//! Scheduled events and the user-authored exceptions that override them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{date::format_date, weekday::Weekday};

/// Where an event came from: the rotation, or an extra occurrence the user
/// added by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  #[default]
  Regular,
  Extra,
}

/// One concrete occurrence on the calendar.
///
/// `weekday` is always derived from `date` by the constructors; it is only
/// `None` for an override whose date string has no calendar reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
  pub date:          String,
  pub weekday:       Option<Weekday>,
  /// Copied by value so renaming a ministry never rewrites past events.
  pub ministry_name: String,
  #[serde(rename = "type")]
  pub kind:          EventKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note:          Option<String>,
}

impl ScheduleEvent {
  /// A rotation-generated event.
  pub fn regular(date: NaiveDate, ministry_name: impl Into<String>) -> Self {
    Self {
      date:          format_date(date),
      weekday:       Some(Weekday::of(date)),
      ministry_name: ministry_name.into(),
      kind:          EventKind::Regular,
      note:          None,
    }
  }
}

impl From<&ExceptionEvent> for ScheduleEvent {
  /// Built from the exception's fields alone; the weekday comes from the
  /// exception's own date.
  fn from(exception: &ExceptionEvent) -> Self {
    Self {
      date:          exception.date.clone(),
      weekday:       Weekday::of_date_str(&exception.date),
      ministry_name: exception.ministry_name.clone(),
      kind:          exception.kind,
      note:          exception.note.clone(),
    }
  }
}

/// A manual override keyed by date. At most one exists per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionEvent {
  pub date:          String,
  pub ministry_name: String,
  #[serde(rename = "type", default)]
  pub kind:          EventKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note:          Option<String>,
}

impl ExceptionEvent {
  pub fn new(date: impl Into<String>, ministry_name: impl Into<String>, kind: EventKind) -> Self {
    Self {
      date: date.into(),
      ministry_name: ministry_name.into(),
      kind,
      note: None,
    }
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.note = Some(note.into());
    self
  }
}
