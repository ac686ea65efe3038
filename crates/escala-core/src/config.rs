//! [`ScheduleConfig`], the single input of the rotation engine.
//!
//! Also home to the defaults, the completion of partial input and the edits
//! a user can make.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  ministry::{Ministry, MinistryInput, NEW_MINISTRY_NAME},
  weekday::Weekday,
};

// ─── Defaults ────────────────────────────────────────────────────────────────

pub const DEFAULT_YEAR: i32 = 2026;
pub const DEFAULT_MINISTRY_NAMES: [&str; 3] = ["Arcanjos", "Viver é Cristo", "Ágape"];
pub const DEFAULT_ACTIVE_WEEKDAYS: [Weekday; 3] = [Weekday::Dom, Weekday::Ter, Weekday::Qui];
pub const DEFAULT_FIFTH_SUNDAY_MINISTRY: &str = "Joias de Cristo";

// ─── Config ──────────────────────────────────────────────────────────────────

/// Everything the rotation engine needs to lay out a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
  pub year:                  i32,
  /// Rotation order. Position in this list, not any property of the
  /// ministry, decides who serves when.
  pub ministries:            Vec<Ministry>,
  pub active_weekdays:       Vec<Weekday>,
  /// Ministry serving the weeks that open on a month's fifth Sunday.
  /// Blank means the rule is off.
  #[serde(default)]
  pub fifth_sunday_ministry: String,
}

impl Default for ScheduleConfig {
  fn default() -> Self {
    Self {
      year:                  DEFAULT_YEAR,
      ministries:            DEFAULT_MINISTRY_NAMES.iter().map(|n| Ministry::new(n)).collect(),
      active_weekdays:       DEFAULT_ACTIVE_WEEKDAYS.to_vec(),
      fifth_sunday_ministry: DEFAULT_FIFTH_SUNDAY_MINISTRY.to_owned(),
    }
  }
}

/// A configuration as found in storage or in an imported document, with
/// any field possibly missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
  pub year:                  Option<i32>,
  pub ministries:            Option<Vec<MinistryInput>>,
  pub active_weekdays:       Option<Vec<String>>,
  pub fifth_sunday_ministry: Option<String>,
}

/// Which way to shift a ministry within the rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Down,
}

impl ScheduleConfig {
  /// Fill the gaps of `partial` with defaults.
  ///
  /// Missing or empty ministry and weekday lists fall back to the defaults.
  /// A non-empty weekday list is kept even if none of its codes are
  /// recognised; such a config simply generates no events.
  pub fn from_partial(partial: PartialConfig) -> Self {
    let defaults = Self::default();

    let ministries = match partial.ministries {
      Some(list) if !list.is_empty() => list.into_iter().map(Ministry::from).collect(),
      _ => defaults.ministries,
    };

    let active_weekdays = match partial.active_weekdays {
      Some(codes) if !codes.is_empty() => Weekday::parse_lenient(codes),
      _ => defaults.active_weekdays,
    };

    Self {
      year: partial.year.unwrap_or(defaults.year),
      ministries,
      active_weekdays,
      fifth_sunday_ministry: partial
        .fifth_sunday_ministry
        .unwrap_or(defaults.fifth_sunday_ministry),
    }
  }

  /// The trimmed fifth-Sunday ministry, if the rule is on.
  pub fn fifth_sunday(&self) -> Option<&str> {
    let name = self.fifth_sunday_ministry.trim();
    (!name.is_empty()).then_some(name)
  }

  pub fn ministry(&self, id: Uuid) -> Option<&Ministry> {
    self.ministries.iter().find(|m| m.id == id)
  }

  fn position(&self, id: Uuid) -> Result<usize> {
    self
      .ministries
      .iter()
      .position(|m| m.id == id)
      .ok_or(Error::MinistryNotFound(id))
  }

  // ── Edits ─────────────────────────────────────────────────────────────────

  pub fn set_year(&mut self, year: i32) { self.year = year; }

  pub fn set_fifth_sunday_ministry(&mut self, name: &str) {
    self.fifth_sunday_ministry = name.trim().to_owned();
  }

  /// Append a ministry to the end of the rotation and return its id.
  pub fn add_ministry(&mut self, name: &str) -> Uuid {
    let name = if name.trim().is_empty() { NEW_MINISTRY_NAME } else { name };
    let ministry = Ministry::new(name);
    let id = ministry.id;
    self.ministries.push(ministry);
    id
  }

  pub fn rename_ministry(&mut self, id: Uuid, name: &str) -> Result<()> {
    let index = self.position(id)?;
    self.ministries[index].name = name.trim().to_owned();
    Ok(())
  }

  /// Swap a ministry with its neighbour. Moving past either end is a no-op.
  pub fn move_ministry(&mut self, id: Uuid, direction: Direction) -> Result<()> {
    let index = self.position(id)?;
    match direction {
      Direction::Up if index > 0 => self.ministries.swap(index, index - 1),
      Direction::Down if index + 1 < self.ministries.len() => {
        self.ministries.swap(index, index + 1)
      }
      _ => {}
    }
    Ok(())
  }

  /// Remove a ministry. The rotation always keeps at least one.
  pub fn remove_ministry(&mut self, id: Uuid) -> Result<Ministry> {
    let index = self.position(id)?;
    if self.ministries.len() <= 1 {
      return Err(Error::LastMinistry);
    }
    Ok(self.ministries.remove(index))
  }

  /// Flip `day` on or off and return whether it is now active. The active
  /// set is kept in week order.
  pub fn toggle_weekday(&mut self, day: Weekday) -> bool {
    let now_active = !self.active_weekdays.contains(&day);
    let mut next: Vec<Weekday> = self
      .active_weekdays
      .iter()
      .copied()
      .filter(|d| *d != day)
      .collect();
    if now_active {
      next.push(day);
    }
    self.active_weekdays = Weekday::ALL.into_iter().filter(|d| next.contains(d)).collect();
    now_active
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn names(config: &ScheduleConfig) -> Vec<&str> {
    config.ministries.iter().map(|m| m.name.as_str()).collect()
  }

  #[test]
  fn default_config_matches_parish_setup() {
    let config = ScheduleConfig::default();
    assert_eq!(config.year, 2026);
    assert_eq!(names(&config), DEFAULT_MINISTRY_NAMES);
    assert_eq!(config.active_weekdays, DEFAULT_ACTIVE_WEEKDAYS);
    assert_eq!(config.fifth_sunday(), Some("Joias de Cristo"));
  }

  #[test]
  fn from_partial_fills_missing_fields() {
    let partial: PartialConfig = serde_json::from_value(serde_json::json!({
      "year": 2027,
      "ministries": [],
    }))
    .unwrap();
    let config = ScheduleConfig::from_partial(partial);

    assert_eq!(config.year, 2027);
    assert_eq!(names(&config), DEFAULT_MINISTRY_NAMES);
    assert_eq!(config.active_weekdays, DEFAULT_ACTIVE_WEEKDAYS);
    assert_eq!(config.fifth_sunday_ministry, DEFAULT_FIFTH_SUNDAY_MINISTRY);
  }

  #[test]
  fn from_partial_keeps_explicit_blank_fifth_sunday() {
    let partial: PartialConfig = serde_json::from_value(serde_json::json!({
      "ministries": ["A", "B"],
      "activeWeekdays": ["dom", "nope"],
      "fifthSundayMinistry": "",
    }))
    .unwrap();
    let config = ScheduleConfig::from_partial(partial);

    assert_eq!(names(&config), ["A", "B"]);
    assert_eq!(config.active_weekdays, [Weekday::Dom]);
    assert_eq!(config.fifth_sunday(), None);
  }

  #[test]
  fn whitespace_fifth_sunday_counts_as_off() {
    let mut config = ScheduleConfig::default();
    config.fifth_sunday_ministry = "   ".into();
    assert_eq!(config.fifth_sunday(), None);
  }

  #[test]
  fn add_rename_and_remove_ministries() {
    let mut config = ScheduleConfig::default();
    let id = config.add_ministry("  ");
    assert_eq!(config.ministry(id).unwrap().name, NEW_MINISTRY_NAME);

    config.rename_ministry(id, " Joias ").unwrap();
    assert_eq!(config.ministry(id).unwrap().name, "Joias");

    let removed = config.remove_ministry(id).unwrap();
    assert_eq!(removed.id, id);
    assert!(config.ministry(id).is_none());

    assert!(matches!(
      config.rename_ministry(id, "x"),
      Err(Error::MinistryNotFound(missing)) if missing == id
    ));
  }

  #[test]
  fn last_ministry_cannot_be_removed() {
    let mut config = ScheduleConfig::default();
    let ids: Vec<Uuid> = config.ministries.iter().map(|m| m.id).collect();
    config.remove_ministry(ids[0]).unwrap();
    config.remove_ministry(ids[1]).unwrap();
    assert!(matches!(config.remove_ministry(ids[2]), Err(Error::LastMinistry)));
    assert_eq!(config.ministries.len(), 1);
  }

  #[test]
  fn move_swaps_neighbours_and_stops_at_ends() {
    let mut config = ScheduleConfig::default();
    let first = config.ministries[0].id;
    let last = config.ministries[2].id;

    config.move_ministry(first, Direction::Up).unwrap();
    assert_eq!(config.ministries[0].id, first);

    config.move_ministry(first, Direction::Down).unwrap();
    assert_eq!(names(&config), ["Viver é Cristo", "Arcanjos", "Ágape"]);

    config.move_ministry(last, Direction::Down).unwrap();
    assert_eq!(config.ministries[2].id, last);
  }

  #[test]
  fn toggle_weekday_keeps_week_order() {
    let mut config = ScheduleConfig::default();
    assert!(config.toggle_weekday(Weekday::Seg));
    assert_eq!(
      config.active_weekdays,
      [Weekday::Dom, Weekday::Seg, Weekday::Ter, Weekday::Qui]
    );
    assert!(!config.toggle_weekday(Weekday::Dom));
    assert_eq!(config.active_weekdays, [Weekday::Seg, Weekday::Ter, Weekday::Qui]);
  }

  #[test]
  fn config_round_trips_through_json() {
    let mut config = ScheduleConfig::default();
    config.year = 2031;
    config.move_ministry(config.ministries[2].id, Direction::Up).unwrap();

    let json = serde_json::to_value(&config).unwrap();
    assert!(json.get("activeWeekdays").is_some());
    assert!(json.get("fifthSundayMinistry").is_some());

    let back: ScheduleConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
  }
}
