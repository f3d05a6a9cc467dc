//! Static column metadata.
//!
//! Every entity declares the columns it owns. The metadata is the single
//! source of truth for which field names a client may use (in filters and
//! patches) and for how a JSON value is stored by a backend.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::{Error, Result};

/// Storage class of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
  Text,
  Integer,
  Real,
  Bool,
  /// Hyphenated lowercase UUID string.
  Uuid,
  /// `YYYY-MM-DD` calendar date.
  Date,
  /// RFC 3339 UTC timestamp.
  Timestamp,
  /// Arbitrary JSON, stored as compact text.
  Json,
}

/// A named column of an entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
  pub name: &'static str,
  pub kind: ColumnKind,
}

impl Column {
  pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
    Self { name, kind }
  }

  pub const fn text(name: &'static str) -> Self { Self::new(name, ColumnKind::Text) }

  pub const fn integer(name: &'static str) -> Self {
    Self::new(name, ColumnKind::Integer)
  }

  pub const fn real(name: &'static str) -> Self { Self::new(name, ColumnKind::Real) }

  pub const fn bool(name: &'static str) -> Self { Self::new(name, ColumnKind::Bool) }

  pub const fn uuid(name: &'static str) -> Self { Self::new(name, ColumnKind::Uuid) }

  pub const fn date(name: &'static str) -> Self { Self::new(name, ColumnKind::Date) }

  pub const fn timestamp(name: &'static str) -> Self {
    Self::new(name, ColumnKind::Timestamp)
  }

  pub const fn json(name: &'static str) -> Self { Self::new(name, ColumnKind::Json) }

  /// Parse a raw query-string value into the JSON value this column stores.
  pub fn parse_value(&self, raw: &str) -> Result<Value> {
    let invalid = |reason: String| Error::InvalidFilter {
      column: self.name.to_owned(),
      value:  raw.to_owned(),
      reason,
    };

    match self.kind {
      ColumnKind::Text => Ok(Value::String(raw.to_owned())),
      ColumnKind::Integer => raw
        .trim()
        .parse::<i64>()
        .map(Value::from)
        .map_err(|e| invalid(e.to_string())),
      ColumnKind::Real => raw
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(e.to_string()))
        .and_then(|f| {
          serde_json::Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| invalid("not a finite number".into()))
        }),
      ColumnKind::Bool => match raw.trim() {
        "true" | "1" => Ok(Value::Bool(true)),
        "false" | "0" => Ok(Value::Bool(false)),
        _ => Err(invalid("expected true or false".into())),
      },
      ColumnKind::Uuid => Uuid::parse_str(raw.trim())
        .map(|id| Value::String(id.hyphenated().to_string()))
        .map_err(|e| invalid(e.to_string())),
      ColumnKind::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|d| Value::String(d.to_string()))
        .map_err(|e| invalid(e.to_string())),
      ColumnKind::Timestamp => DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| Value::String(canonical_timestamp(dt.with_timezone(&Utc))))
        .map_err(|e| invalid(e.to_string())),
      ColumnKind::Json => Err(invalid("json columns cannot be filtered".into())),
    }
  }
}

/// The fixed textual form timestamps are stored in, so that they sort
/// lexicographically.
pub fn canonical_timestamp(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ─── Server-managed columns ──────────────────────────────────────────────────

pub const ID: Column = Column::uuid("id");
pub const CREATED_AT: Column = Column::timestamp("created_at");
pub const UPDATED_AT: Column = Column::timestamp("updated_at");

/// Columns every table carries in addition to its entity columns.
pub const SYSTEM_COLUMNS: [Column; 3] = [ID, CREATED_AT, UPDATED_AT];

pub fn is_system_column(name: &str) -> bool {
  SYSTEM_COLUMNS.iter().any(|c| c.name == name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_values_by_kind() {
    assert_eq!(Column::integer("n").parse_value("42").unwrap(), Value::from(42));
    assert_eq!(Column::bool("b").parse_value("1").unwrap(), Value::Bool(true));
    assert_eq!(
      Column::date("d").parse_value("2024-09-05").unwrap(),
      Value::String("2024-09-05".into())
    );
    assert_eq!(Column::text("t").parse_value(" a b ").unwrap(), Value::String(" a b ".into()));
  }

  #[test]
  fn rejects_malformed_values() {
    assert!(matches!(
      Column::uuid("hoc_sinh_id").parse_value("nope"),
      Err(Error::InvalidFilter { .. })
    ));
    assert!(Column::date("ngay").parse_value("05/09/2024").is_err());
    assert!(Column::real("so_tien").parse_value("NaN").is_err());
    assert!(Column::json("thong_tin").parse_value("{}").is_err());
  }

  #[test]
  fn timestamps_are_normalised_to_utc_micros() {
    let v = Column::timestamp("het_han")
      .parse_value("2024-01-01T07:00:00+07:00")
      .unwrap();
    assert_eq!(v, Value::String("2024-01-01T00:00:00.000000Z".into()));
  }
}
