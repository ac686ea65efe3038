//! Calendar helpers shared by the rotation engine, the merger and the month
//! views. Dates travel as `YYYY-MM-DD` strings outside this module.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};

/// The one date format used for event keys and on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

/// Strict parse: only a canonical, zero-padded `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
  let date = NaiveDate::parse_from_str(input, DATE_FORMAT).ok()?;
  (format_date(date) == input).then_some(date)
}

/// Best-effort parse used where garbage-in is tolerated.
///
/// Accepts `YYYY-MM-DD` (padding optional), RFC 3339 timestamps and naive
/// `YYYY-MM-DDTHH:MM:SS` timestamps. A day past the end of its month rolls
/// forward into the next one, so `2026-02-30` reads as March 2.
pub fn parse_date_lenient(input: &str) -> Option<NaiveDate> {
  let s = input.trim();
  if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
    return Some(date);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.date_naive());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
    return Some(dt.date());
  }
  rolled_over(s)
}

fn rolled_over(s: &str) -> Option<NaiveDate> {
  let mut parts = s.splitn(3, '-');
  let year: i32 = parts.next()?.parse().ok()?;
  let month: u32 = parts.next()?.parse().ok()?;
  let day: u32 = parts.next()?.parse().ok()?;
  if day == 0 {
    return None;
  }
  NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(day - 1)))
}

/// January 1 and December 31 of `year`, or `None` outside chrono's range.
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
  Some((
    NaiveDate::from_ymd_opt(year, 1, 1)?,
    NaiveDate::from_ymd_opt(year, 12, 31)?,
  ))
}

/// The Sunday that opens the week containing `date`.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
  let offset = date.weekday().num_days_from_sunday();
  date.checked_sub_days(Days::new(u64::from(offset)))
}

/// Which occurrence of its weekday `date` is within its month (1-based).
pub fn occurrence_in_month(date: NaiveDate) -> u32 { (date.day() - 1) / 7 + 1 }

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
  let first = NaiveDate::from_ymd_opt(year, month, 1)?;
  let next = if month == 12 {
    NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
  } else {
    NaiveDate::from_ymd_opt(year, month + 1, 1)?
  };
  u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn strict_parse_rejects_unpadded_and_impossible_dates() {
    assert_eq!(parse_date("2026-01-04"), Some(ymd(2026, 1, 4)));
    assert_eq!(parse_date("2026-1-4"), None);
    assert_eq!(parse_date("2026-02-30"), None);
    assert_eq!(parse_date("not a date"), None);
  }

  #[test]
  fn lenient_parse_accepts_timestamps_and_rolls_over() {
    assert_eq!(parse_date_lenient("2026-1-4"), Some(ymd(2026, 1, 4)));
    assert_eq!(parse_date_lenient("2026-01-04T10:30:00Z"), Some(ymd(2026, 1, 4)));
    assert_eq!(parse_date_lenient("2026-01-04T10:30:00"), Some(ymd(2026, 1, 4)));
    assert_eq!(parse_date_lenient("2026-02-30"), Some(ymd(2026, 3, 2)));
    assert_eq!(parse_date_lenient("garbage"), None);
    assert_eq!(parse_date_lenient("2026-13-01"), None);
  }

  #[test]
  fn week_start_is_previous_sunday() {
    assert_eq!(week_start(ymd(2026, 1, 1)), Some(ymd(2025, 12, 28)));
    assert_eq!(week_start(ymd(2026, 1, 4)), Some(ymd(2026, 1, 4)));
    assert_eq!(week_start(ymd(2026, 1, 10)), Some(ymd(2026, 1, 4)));
  }

  #[test]
  fn occurrence_counts_from_first_of_month() {
    assert_eq!(occurrence_in_month(ymd(2026, 8, 2)), 1);
    assert_eq!(occurrence_in_month(ymd(2026, 8, 28)), 4);
    assert_eq!(occurrence_in_month(ymd(2026, 8, 30)), 5);
  }

  #[test]
  fn month_lengths_include_leap_february() {
    assert_eq!(days_in_month(2024, 2), Some(29));
    assert_eq!(days_in_month(2026, 2), Some(28));
    assert_eq!(days_in_month(2026, 12), Some(31));
    assert_eq!(days_in_month(2026, 13), None);
  }
}
