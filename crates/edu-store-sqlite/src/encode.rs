//! Encoding and decoding between JSON-shaped entity values and the SQLite
//! storage classes their columns declare.
//!
//! Timestamps are stored as RFC 3339 strings with microsecond precision so
//! they sort lexicographically. Dates are `YYYY-MM-DD`, UUIDs hyphenated
//! lowercase, booleans `0`/`1`, and JSON columns compact text.

use chrono::{DateTime, NaiveDate, Utc};
use edu_core::{
  Entity, Record,
  column::{self, Column, ColumnKind},
};
use rusqlite::types::Value as SqlValue;
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn encode_dt(dt: DateTime<Utc>) -> String { column::canonical_timestamp(dt) }

// ─── Column values ───────────────────────────────────────────────────────────

/// Convert one JSON value into the SQLite value stored for `column`.
pub fn encode_value(column: &Column, value: &Value) -> Result<SqlValue> {
  let mismatch = || Error::Encode {
    column: column.name.to_owned(),
    kind:   format!("{:?}", column.kind),
    value:  value.to_string(),
  };

  if value.is_null() {
    return Ok(SqlValue::Null);
  }

  match column.kind {
    ColumnKind::Text => value
      .as_str()
      .map(|s| SqlValue::Text(s.to_owned()))
      .ok_or_else(mismatch),
    ColumnKind::Integer => value.as_i64().map(SqlValue::Integer).ok_or_else(mismatch),
    ColumnKind::Real => value.as_f64().map(SqlValue::Real).ok_or_else(mismatch),
    ColumnKind::Bool => value
      .as_bool()
      .map(|b| SqlValue::Integer(i64::from(b)))
      .ok_or_else(mismatch),
    ColumnKind::Uuid => value
      .as_str()
      .and_then(|s| Uuid::parse_str(s).ok())
      .map(|id| SqlValue::Text(encode_uuid(id)))
      .ok_or_else(mismatch),
    ColumnKind::Date => value
      .as_str()
      .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
      .map(|d| SqlValue::Text(d.to_string()))
      .ok_or_else(mismatch),
    ColumnKind::Timestamp => value
      .as_str()
      .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
      .map(|dt| SqlValue::Text(encode_dt(dt.with_timezone(&Utc))))
      .ok_or_else(mismatch),
    ColumnKind::Json => Ok(SqlValue::Text(value.to_string())),
  }
}

/// Convert a stored SQLite value back into JSON according to `column`.
pub fn decode_value(column: &Column, value: SqlValue) -> Result<Value> {
  let fail = |reason: &str| Error::Decode {
    column: column.name.to_owned(),
    reason: reason.to_owned(),
  };

  match (column.kind, value) {
    (_, SqlValue::Null) => Ok(Value::Null),
    (ColumnKind::Bool, SqlValue::Integer(i)) => Ok(Value::Bool(i != 0)),
    (ColumnKind::Real, SqlValue::Integer(i)) => real(i as f64).ok_or_else(|| fail("non-finite")),
    (ColumnKind::Integer, SqlValue::Integer(i)) => Ok(Value::from(i)),
    (ColumnKind::Real, SqlValue::Real(f)) => real(f).ok_or_else(|| fail("non-finite")),
    (ColumnKind::Json, SqlValue::Text(s)) => Ok(serde_json::from_str(&s)?),
    (
      ColumnKind::Text | ColumnKind::Uuid | ColumnKind::Date | ColumnKind::Timestamp,
      SqlValue::Text(s),
    ) => Ok(Value::String(s)),
    (kind, other) => Err(fail(&format!(
      "{:?} value stored in {kind:?} column",
      other.data_type()
    ))),
  }
}

fn real(f: f64) -> Option<Value> { Number::from_f64(f).map(Value::Number) }

// ─── Rows ────────────────────────────────────────────────────────────────────

/// The column list selected for a full row of `E`: server-managed columns
/// first, then the entity's own.
pub fn row_columns<E: Entity>() -> impl Iterator<Item = &'static Column> {
  column::SYSTEM_COLUMNS.iter().chain(E::COLUMNS.iter())
}

/// Comma-separated `row_columns`, optionally qualified with a table alias.
pub fn select_list<E: Entity>(alias: Option<&str>) -> String {
  row_columns::<E>()
    .map(|c| match alias {
      Some(a) => format!("{a}.{}", c.name),
      None => c.name.to_owned(),
    })
    .collect::<Vec<_>>()
    .join(", ")
}

/// Encode the entity's own columns of `data`, in [`Entity::COLUMNS`] order.
pub fn encode_data<E: Entity>(data: &E) -> Result<Vec<SqlValue>> {
  let Value::Object(map) = serde_json::to_value(data)? else {
    return Err(Error::Core(edu_core::Error::NotAnObject));
  };
  E::COLUMNS
    .iter()
    .map(|c| encode_value(c, map.get(c.name).unwrap_or(&Value::Null)))
    .collect()
}

/// Decode a row selected with [`select_list`] into a typed record.
pub fn decode_record<E: Entity>(row: Vec<SqlValue>) -> Result<Record<E>> {
  let mut map = Map::with_capacity(row.len());
  for (column, value) in row_columns::<E>().zip(row) {
    map.insert(column.name.to_owned(), decode_value(column, value)?);
  }
  serde_json::from_value(Value::Object(map)).map_err(|e| Error::Decode {
    column: E::TABLE.to_owned(),
    reason: e.to_string(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bools_round_trip_through_integers() {
    let c = Column::bool("hoat_dong");
    assert_eq!(encode_value(&c, &Value::Bool(true)).unwrap(), SqlValue::Integer(1));
    assert_eq!(decode_value(&c, SqlValue::Integer(0)).unwrap(), Value::Bool(false));
  }

  #[test]
  fn uuids_and_timestamps_are_normalised() {
    let id = Uuid::new_v4();
    let upper = Value::String(id.to_string().to_uppercase());
    assert_eq!(
      encode_value(&Column::uuid("lop_id"), &upper).unwrap(),
      SqlValue::Text(id.to_string())
    );

    let ts = Value::String("2024-05-01T09:30:00+07:00".into());
    assert_eq!(
      encode_value(&Column::timestamp("het_han"), &ts).unwrap(),
      SqlValue::Text("2024-05-01T02:30:00.000000Z".into())
    );
  }

  #[test]
  fn type_mismatch_is_an_encode_error() {
    let err = encode_value(&Column::integer("thang"), &Value::String("March".into()));
    assert!(matches!(err, Err(Error::Encode { .. })));
  }

  #[test]
  fn json_columns_store_text() {
    let c = Column::json("thong_tin");
    let v = serde_json::json!({ "ua": "curl" });
    let stored = encode_value(&c, &v).unwrap();
    assert_eq!(decode_value(&c, stored).unwrap(), v);
  }

  #[test]
  fn integer_in_real_column_decodes_as_number() {
    let v = decode_value(&Column::real("so_tien"), SqlValue::Integer(250)).unwrap();
    assert_eq!(v.as_f64(), Some(250.0));
  }
}
