//! The rotation engine: a [`ScheduleConfig`] in, a year of regular events
//! out.
//!
//! # Weekly blocks
//!
//! The year is cut into Sunday-anchored weeks, from the week holding
//! January 1 to the week holding December 31. Rotation advances once per
//! week and every active day of a week gets that week's ministry.
//!
//! - Weeks anchored inside the year take turns in list order, so the first
//!   Sunday of the year always opens with the first ministry.
//! - When January 1 is not a Sunday, the leading week is anchored in the
//!   previous December. It continues last year's rotation: it gets the last
//!   ministry in the list and does not use up a turn. Weeks are counted per
//!   month from January 1 on, so this week is the first of its December and
//!   never a fifth-Sunday week.
//! - A week anchored on its month's fifth Sunday goes to the fifth-Sunday
//!   ministry, when one is set, and does not use up a turn either. The
//!   whole week follows, including days already in the next month.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::{
  config::ScheduleConfig,
  date::{occurrence_in_month, week_start, year_bounds},
  event::ScheduleEvent,
  ministry::Ministry,
  weekday::Weekday,
};

/// Stands in for the rotation when no ministry has a usable name.
pub const FALLBACK_MINISTRY_NAME: &str = "Ministerio";

/// Generate every regular event of `config.year`, in date order.
///
/// Pure and deterministic. Degenerate input never fails: no active weekday
/// gives an empty schedule, no named ministry gives a one-ministry rotation
/// of [`FALLBACK_MINISTRY_NAME`].
pub fn generate(config: &ScheduleConfig) -> Vec<ScheduleEvent> {
  let weekdays = active_weekdays(&config.active_weekdays);
  if weekdays.is_empty() {
    return Vec::new();
  }
  let Some((first, last)) = year_bounds(config.year) else {
    return Vec::new();
  };

  let names = rotation_names(&config.ministries);
  let weeks = assign_weeks(first, last, &names, config.fifth_sunday());

  first
    .iter_days()
    .take_while(|day| *day <= last)
    .filter(|day| weekdays.contains(&Weekday::of(*day)))
    .filter_map(|day| {
      let anchor = week_start(day)?;
      let name = weeks.get(&anchor)?;
      Some(ScheduleEvent::regular(day, *name))
    })
    .collect()
}

fn active_weekdays(configured: &[Weekday]) -> Vec<Weekday> {
  let mut days = Vec::with_capacity(Weekday::ALL.len());
  for day in configured {
    if !days.contains(day) {
      days.push(*day);
    }
  }
  days
}

/// Trimmed, non-empty ministry names in rotation order; never empty.
pub fn rotation_names(ministries: &[Ministry]) -> Vec<&str> {
  let names: Vec<&str> = ministries
    .iter()
    .map(|m| m.name.trim())
    .filter(|name| !name.is_empty())
    .collect();
  if names.is_empty() { vec![FALLBACK_MINISTRY_NAME] } else { names }
}

/// Map each week's Sunday anchor to the ministry serving that week.
fn assign_weeks<'a>(
  first: NaiveDate,
  last: NaiveDate,
  names: &[&'a str],
  fifth_sunday: Option<&'a str>,
) -> BTreeMap<NaiveDate, &'a str> {
  let mut weeks = BTreeMap::new();
  let (Some(mut anchor), Some(last_anchor)) = (week_start(first), week_start(last)) else {
    return weeks;
  };
  let carried_over = names[names.len() - 1];
  let mut turn = 0usize;

  while anchor <= last_anchor {
    let name = match fifth_sunday {
      _ if anchor < first => carried_over,
      Some(special) if occurrence_in_month(anchor) == 5 => special,
      _ => {
        let name = names[turn % names.len()];
        turn += 1;
        name
      }
    };
    weeks.insert(anchor, name);

    match anchor.checked_add_days(Days::new(7)) {
      Some(next) => anchor = next,
      None => break,
    }
  }
  weeks
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config(year: i32, names: &[&str], days: &[Weekday], fifth: &str) -> ScheduleConfig {
    ScheduleConfig {
      year,
      ministries: names.iter().map(|n| Ministry::new(n)).collect(),
      active_weekdays: days.to_vec(),
      fifth_sunday_ministry: fifth.to_owned(),
    }
  }

  fn on<'a>(events: &'a [ScheduleEvent], date: &str) -> &'a ScheduleEvent {
    events
      .iter()
      .find(|e| e.date == date)
      .unwrap_or_else(|| panic!("no event on {date}"))
  }

  #[test]
  fn no_active_weekdays_means_no_events() {
    let events = generate(&config(2026, &["A"], &[], ""));
    assert!(events.is_empty());
  }

  #[test]
  fn blank_ministries_fall_back_to_placeholder() {
    let events = generate(&config(2026, &["  ", ""], &[Weekday::Dom], ""));
    assert_eq!(events.len(), 52);
    assert!(events.iter().all(|e| e.ministry_name == FALLBACK_MINISTRY_NAME));
  }

  #[test]
  fn blank_names_are_skipped_in_rotation() {
    let events = generate(&config(2026, &["A", " ", "B"], &[Weekday::Dom], ""));
    let firsts: Vec<&str> = events.iter().take(4).map(|e| e.ministry_name.as_str()).collect();
    assert_eq!(firsts, ["A", "B", "A", "B"]);
  }

  #[test]
  fn repeated_weekdays_do_not_duplicate_events() {
    let events = generate(&config(2026, &["A"], &[Weekday::Dom, Weekday::Dom], ""));
    assert_eq!(events.len(), 52);
  }

  #[test]
  fn leading_partial_week_carries_last_ministry() {
    // 2026-01-01 is a Thursday; its week opens on 2025-12-28.
    let events = generate(&config(2026, &["A", "B", "C"], &[Weekday::Qui, Weekday::Dom], ""));
    assert_eq!(on(&events, "2026-01-01").ministry_name, "C");
    assert_eq!(on(&events, "2026-01-04").ministry_name, "A");
    assert_eq!(on(&events, "2026-01-08").ministry_name, "A");
  }

  #[test]
  fn year_starting_on_sunday_opens_with_first_ministry() {
    // 2023-01-01 is a Sunday.
    let events = generate(&config(2023, &["A", "B"], &[Weekday::Dom, Weekday::Seg], ""));
    assert_eq!(on(&events, "2023-01-01").ministry_name, "A");
    assert_eq!(on(&events, "2023-01-02").ministry_name, "A");
    assert_eq!(on(&events, "2023-01-08").ministry_name, "B");
  }

  #[test]
  fn leading_week_anchored_on_day_29_still_carries_over() {
    // 2025-01-01 is a Wednesday; its week opens on 2024-12-29, the first
    // December week counted for 2025.
    let events = generate(&config(2025, &["A", "B"], &[Weekday::Qui], "Z"));
    assert_eq!(on(&events, "2025-01-02").ministry_name, "B");
    assert_eq!(on(&events, "2025-01-09").ministry_name, "A");
  }

  #[test]
  fn trailing_week_is_included() {
    // 2026-12-31 is a Thursday in the week of 2026-12-27.
    let events = generate(&config(2026, &["A"], &[Weekday::Qui], ""));
    assert_eq!(events.last().unwrap().date, "2026-12-31");
  }

  #[test]
  fn out_of_range_year_is_empty() {
    let events = generate(&config(i32::MAX, &["A"], &[Weekday::Dom], ""));
    assert!(events.is_empty());
  }
}
