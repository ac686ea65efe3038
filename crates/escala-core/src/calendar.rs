//! Month views over a merged schedule: the flat month list and the
//! Sunday-first grid the calendar and the printable card are drawn from.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
  Error, Result,
  date::{days_in_month, parse_date_lenient},
  event::ScheduleEvent,
  weekday::Weekday,
};

/// Events of `events` falling in `month` (1–12), in their original order.
pub fn month_events(events: &[ScheduleEvent], month: u32) -> Vec<ScheduleEvent> {
  events
    .iter()
    .filter(|e| parse_date_lenient(&e.date).is_some_and(|d| d.month() == month))
    .cloned()
    .collect()
}

/// One square of the month grid. Padding squares before the 1st and after
/// the last day have no `day` and no `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
  pub day:     Option<u32>,
  pub date:    Option<String>,
  pub weekday: Weekday,
  pub event:   Option<ScheduleEvent>,
}

/// A month laid out as whole Sunday-to-Saturday weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
  pub year:  i32,
  pub month: u32,
  pub weeks: Vec<[CalendarCell; 7]>,
}

impl MonthGrid {
  /// Lay out `month` of `year`, attaching the event (if any) on each day.
  pub fn build(year: i32, month: u32, events: &[ScheduleEvent]) -> Result<Self> {
    let invalid = || Error::InvalidDate(format!("{year}-{month:02}"));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let length = days_in_month(year, month).ok_or_else(invalid)?;
    let lead = Weekday::of(first).index() as u32;

    let by_date: BTreeMap<&str, &ScheduleEvent> =
      events.iter().map(|e| (e.date.as_str(), e)).collect();

    let total = (lead + length).div_ceil(7) * 7;
    let cells: Vec<CalendarCell> = (0..total)
      .map(|index| {
        let weekday = Weekday::from_index(index as usize);
        let day = (index + 1).checked_sub(lead).filter(|d| (1..=length).contains(d));
        let date = day.map(|d| format!("{year}-{month:02}-{d:02}"));
        let event = date
          .as_deref()
          .and_then(|key| by_date.get(key))
          .map(|e| (*e).clone());
        CalendarCell { day, date, weekday, event }
      })
      .collect();

    let weeks = cells
      .chunks(7)
      .map(|week| {
        <[CalendarCell; 7]>::try_from(week.to_vec())
          .map_err(|_| Error::InvalidDate(format!("{year}-{month:02}")))
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Self { year, month, weeks })
  }
}
