//! The [`Entity`] trait and the stored [`Record`] envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::{
  Error, Result,
  column::{self, Column},
};

/// A row type of the school schema.
///
/// Implementors hold only their own columns; identity and timestamps live in
/// the surrounding [`Record`]. Dispatch from HTTP routes to storage happens
/// through this trait's type parameter, so every table is reached through
/// compile-time checked code.
pub trait Entity:
  Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static
{
  /// Singular human-readable name, used in messages.
  const NAME: &'static str;
  /// Database table.
  const TABLE: &'static str;
  /// Path segment under `/api`.
  const PATH: &'static str;
  /// Entity-owned columns, in table order.
  const COLUMNS: &'static [Column];
  /// Extra query-string names accepted as filters, mapped to column names.
  const FILTER_ALIASES: &'static [(&'static str, &'static str)] = &[];

  /// Entity-level rules beyond what deserialization already enforces.
  fn validate(&self) -> Result<()> { Ok(()) }
}

/// A persisted row: server-assigned identity and timestamps plus the
/// entity's columns, flattened into one JSON object on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<E> {
  pub id:         Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub data:       E,
}

/// Look up a column of `E` by name, including the server-managed columns.
pub fn find_column<E: Entity>(name: &str) -> Option<Column> {
  E::COLUMNS
    .iter()
    .chain(column::SYSTEM_COLUMNS.iter())
    .find(|c| c.name == name)
    .copied()
}

/// Decode a client-supplied JSON body into a new, validated `E`.
///
/// Only the entity's own columns may appear; server-managed columns are
/// rejected rather than silently ignored.
pub fn parse_draft<E: Entity>(body: Value) -> Result<E> {
  let Value::Object(map) = &body else {
    return Err(Error::NotAnObject);
  };
  for key in map.keys() {
    check_writable::<E>(key)?;
  }

  let draft: E = serde_json::from_value(body)
    .map_err(|e| Error::validation(E::NAME, e.to_string()))?;
  draft.validate()?;
  Ok(draft)
}

/// Fail unless `name` is an entity-owned column of `E`.
pub(crate) fn check_writable<E: Entity>(name: &str) -> Result<()> {
  if column::is_system_column(name) {
    return Err(Error::ReadOnlyColumn(name.to_owned()));
  }
  if !E::COLUMNS.iter().any(|c| c.name == name) {
    return Err(Error::UnknownColumn {
      entity: E::NAME,
      column: name.to_owned(),
    });
  }
  Ok(())
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Static description of one entity table.
#[derive(Debug, Clone, Copy)]
pub struct TableInfo {
  pub name:    &'static str,
  pub table:   &'static str,
  pub path:    &'static str,
  pub columns: &'static [Column],
}

impl TableInfo {
  pub const fn of<E: Entity>() -> Self {
    Self {
      name:    E::NAME,
      table:   E::TABLE,
      path:    E::PATH,
      columns: E::COLUMNS,
    }
  }
}
