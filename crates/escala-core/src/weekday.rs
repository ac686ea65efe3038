//! The seven days of the week, identified by their three-letter codes.
//!
//! The week starts on Sunday (`DOM`, index 0) and ends on Saturday (`SAB`,
//! index 6). Codes parse case-insensitively.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::date::parse_date_lenient;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(try_from = "String", into = "&'static str")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Weekday {
  Dom,
  Seg,
  Ter,
  Qua,
  Qui,
  Sex,
  Sab,
}

impl Weekday {
  /// Every weekday in week order, Sunday first.
  pub const ALL: [Weekday; 7] = [
    Weekday::Dom,
    Weekday::Seg,
    Weekday::Ter,
    Weekday::Qua,
    Weekday::Qui,
    Weekday::Sex,
    Weekday::Sab,
  ];

  /// Position within the week, `0` for Sunday through `6` for Saturday.
  pub fn index(self) -> usize { self as usize }

  /// The weekday at `index`, wrapping past Saturday.
  pub fn from_index(index: usize) -> Self { Self::ALL[index % 7] }

  /// The day of the week `date` falls on.
  pub fn of(date: NaiveDate) -> Self {
    Self::from_index(date.weekday().num_days_from_sunday() as usize)
  }

  /// Best-effort weekday for a date string; `None` when the string has no
  /// calendar reading at all.
  pub fn of_date_str(date: &str) -> Option<Self> {
    parse_date_lenient(date).map(Self::of)
  }

  pub fn code(self) -> &'static str { self.into() }

  /// Full Portuguese day name, as shown on the calendar headers.
  pub fn label(self) -> &'static str {
    match self {
      Weekday::Dom => "Domingo",
      Weekday::Seg => "Segunda",
      Weekday::Ter => "Terça",
      Weekday::Qua => "Quarta",
      Weekday::Qui => "Quinta",
      Weekday::Sex => "Sexta",
      Weekday::Sab => "Sábado",
    }
  }

  /// Parse a list of codes, dropping anything unrecognised and any repeat
  /// of an earlier code. Input order is preserved.
  pub fn parse_lenient<I, S>(codes: I) -> Vec<Weekday>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut out = Vec::new();
    for code in codes {
      if let Ok(day) = code.as_ref().trim().parse::<Weekday>()
        && !out.contains(&day)
      {
        out.push(day);
      }
    }
    out
  }
}

impl TryFrom<String> for Weekday {
  type Error = strum::ParseError;

  fn try_from(value: String) -> Result<Self, Self::Error> { value.trim().parse() }
}
