//! The bulk import/export document: `{ "config": ..., "exceptions": [...] }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  Error, Result,
  config::{PartialConfig, ScheduleConfig},
  event::ExceptionEvent,
  exceptions::exceptions_from_value,
};

/// Everything the user owns, in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDocument {
  pub config:     ScheduleConfig,
  pub exceptions: Vec<ExceptionEvent>,
}

/// What an import found. A part absent from the document is `None` and
/// leaves the corresponding current state untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
  pub config:     Option<ScheduleConfig>,
  pub exceptions: Option<Vec<ExceptionEvent>>,
}

/// Suggested file name for an exported document.
pub fn export_file_name(year: i32) -> String { format!("escala-missa-{year}.json") }

impl ScheduleDocument {
  pub fn new(config: ScheduleConfig, exceptions: Vec<ExceptionEvent>) -> Self {
    Self { config, exceptions }
  }

  pub fn to_json_pretty(&self) -> Result<String> { Ok(serde_json::to_string_pretty(self)?) }

  /// Read an untrusted document.
  ///
  /// The top level must be an object. `config`, when present, must be an
  /// object and is completed with defaults. `exceptions`, when an array, is
  /// filtered entry by entry; any other value is ignored.
  pub fn import(value: &Value) -> Result<ImportOutcome> {
    let object = value
      .as_object()
      .ok_or_else(|| Error::InvalidDocument("expected a JSON object".into()))?;

    let config = match object.get("config") {
      None | Some(Value::Null) => None,
      Some(raw) => {
        let partial: PartialConfig = serde_json::from_value(raw.clone())
          .map_err(|e| Error::InvalidDocument(format!("config: {e}")))?;
        Some(ScheduleConfig::from_partial(partial))
      }
    };

    let exceptions = object
      .get("exceptions")
      .filter(|raw| raw.is_array())
      .map(exceptions_from_value);

    Ok(ImportOutcome { config, exceptions })
  }

  /// Parse and [`import`](Self::import) a document from text.
  pub fn import_str(text: &str) -> Result<ImportOutcome> {
    let value: Value = serde_json::from_str(text)
      .map_err(|e| Error::InvalidDocument(format!("not valid JSON: {e}")))?;
    Self::import(&value)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::{config::Direction, event::EventKind};

  #[test]
  fn export_then_import_is_lossless() {
    let mut config = ScheduleConfig::default();
    config.set_year(2027);
    let last = config.ministries[2].id;
    config.move_ministry(last, Direction::Up).unwrap();
    let exceptions = vec![
      ExceptionEvent::new("2027-01-05", "Especial", EventKind::Extra).with_note("Celebração"),
      ExceptionEvent::new("2027-01-03", "Ágape", EventKind::Regular),
    ];
    let document = ScheduleDocument::new(config.clone(), exceptions.clone());

    let text = document.to_json_pretty().unwrap();
    let outcome = ScheduleDocument::import_str(&text).unwrap();

    assert_eq!(outcome.config, Some(config));
    assert_eq!(outcome.exceptions, Some(exceptions));
  }

  #[test]
  fn non_object_is_rejected() {
    assert!(matches!(ScheduleDocument::import(&json!([1, 2])), Err(Error::InvalidDocument(_))));
    assert!(matches!(ScheduleDocument::import_str("{oops"), Err(Error::InvalidDocument(_))));
  }

  #[test]
  fn malformed_config_is_rejected() {
    let result = ScheduleDocument::import(&json!({ "config": "2026" }));
    assert!(matches!(result, Err(Error::InvalidDocument(_))));
  }

  #[test]
  fn missing_parts_are_left_alone() {
    let outcome = ScheduleDocument::import(&json!({ "exceptions": "nope" })).unwrap();
    assert_eq!(outcome, ImportOutcome::default());
  }

  #[test]
  fn partial_config_is_completed_on_import() {
    let outcome = ScheduleDocument::import(&json!({
      "config": { "year": 2029, "ministries": ["X", { "name": "Y" }] },
      "exceptions": [{ "date": "2029-02-01", "ministryName": "X" }, { "bad": true }],
    }))
    .unwrap();

    let config = outcome.config.unwrap();
    assert_eq!(config.year, 2029);
    assert_eq!(config.ministries.len(), 2);
    assert_eq!(config.fifth_sunday_ministry, "Joias de Cristo");
    assert_eq!(outcome.exceptions.unwrap().len(), 1);
  }

  #[test]
  fn file_name_carries_the_year() {
    assert_eq!(export_file_name(2026), "escala-missa-2026.json");
  }
}
