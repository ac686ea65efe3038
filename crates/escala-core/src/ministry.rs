//! Ministries, the participants that take turns in the rotation.
//!
//! A ministry's id is fixed at creation; its name is free text the user may
//! edit at any time. Events copy the name, never the id, so renaming or
//! removing a ministry leaves already-materialised events untouched.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to a ministry added without one.
pub const NEW_MINISTRY_NAME: &str = "Novo Ministério";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ministry {
  pub id:   Uuid,
  pub name: String,
}

impl Ministry {
  /// A ministry with a fresh random id and a trimmed name.
  pub fn new(name: &str) -> Self {
    Self {
      id:   Uuid::new_v4(),
      name: name.trim().to_owned(),
    }
  }
}

/// A ministry as it may appear in persisted or imported data: either a bare
/// name or a record whose id may be missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MinistryInput {
  Name(String),
  Record {
    #[serde(default)]
    id:   Option<Uuid>,
    #[serde(default)]
    name: String,
  },
}

impl From<MinistryInput> for Ministry {
  fn from(input: MinistryInput) -> Self {
    match input {
      MinistryInput::Name(name) => Ministry::new(&name),
      MinistryInput::Record { id, name } => Ministry {
        id:   id.unwrap_or_else(Uuid::new_v4),
        name: name.trim().to_owned(),
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_trims_and_assigns_distinct_ids() {
    let a = Ministry::new("  Arcanjos ");
    let b = Ministry::new("Arcanjos");
    assert_eq!(a.name, "Arcanjos");
    assert_ne!(a.id, b.id);
  }

  #[test]
  fn input_accepts_bare_names_and_records() {
    let id = Uuid::new_v4();
    let raw = serde_json::json!(["Ágape", { "id": id, "name": " Viver é Cristo " }, { "name": "Sem id" }]);
    let inputs: Vec<MinistryInput> = serde_json::from_value(raw).unwrap();
    let ministries: Vec<Ministry> = inputs.into_iter().map(Ministry::from).collect();

    assert_eq!(ministries[0].name, "Ágape");
    assert_eq!(ministries[1].id, id);
    assert_eq!(ministries[1].name, "Viver é Cristo");
    assert_eq!(ministries[2].name, "Sem id");
  }
}
