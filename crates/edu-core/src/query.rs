//! Query and partial-update types shared by the API and storage layers.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  column::{self, Column},
  record::{Entity, Record, check_writable, find_column},
};

// ─── List query ──────────────────────────────────────────────────────────────

/// An equality condition on one declared column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
  pub column: Column,
  pub value:  Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
  pub column:     Column,
  pub descending: bool,
}

/// Parameters for [`Repository::list`](crate::store::Repository::list).
///
/// Column references are resolved against the entity's metadata when the
/// query is built, so a backend only ever sees declared column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
  pub filters: Vec<Filter>,
  /// Defaults to `created_at` ascending.
  pub sort:    Option<Sort>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}

impl ListQuery {
  pub fn new() -> Self { Self::default() }

  /// Build a query from URL query parameters.
  ///
  /// `sort` (`col` or `-col`), `limit` and `offset` are reserved; every other
  /// key must name a column of `E` (or one of its filter aliases).
  pub fn from_params<E: Entity>(params: &[(String, String)]) -> Result<Self> {
    let mut query = Self::new();
    for (key, raw) in params {
      match key.as_str() {
        "sort" => {
          let (name, descending) = match raw.strip_prefix('-') {
            Some(name) => (name, true),
            None => (raw.as_str(), false),
          };
          query.sort = Some(Sort {
            column: resolve::<E>(name)?,
            descending,
          });
        }
        "limit" => query.limit = Some(parse_count(key, raw)?),
        "offset" => query.offset = Some(parse_count(key, raw)?),
        _ => {
          let column = resolve::<E>(key)?;
          let value = column.parse_value(raw)?;
          query.filters.push(Filter { column, value });
        }
      }
    }
    Ok(query)
  }

  /// Add an equality filter on `name`.
  pub fn filter<E: Entity>(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
    let column = resolve::<E>(name)?;
    self.filters.push(Filter { column, value: value.into() });
    Ok(self)
  }
}

fn resolve<E: Entity>(name: &str) -> Result<Column> {
  let name = E::FILTER_ALIASES
    .iter()
    .find(|(alias, _)| *alias == name)
    .map_or(name, |(_, target)| *target);

  find_column::<E>(name).ok_or_else(|| Error::UnknownColumn {
    entity: E::NAME,
    column: name.to_owned(),
  })
}

fn parse_count(key: &str, raw: &str) -> Result<usize> {
  raw.trim().parse().map_err(|e: std::num::ParseIntError| Error::InvalidFilter {
    column: key.to_owned(),
    value:  raw.to_owned(),
    reason: e.to_string(),
  })
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// A partial update: the set of columns to overwrite and their new values.
///
/// Columns absent from the patch keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Patch {
  fields: Map<String, Value>,
}

impl Patch {
  /// Parse a JSON object into a patch for `E`, rejecting unknown and
  /// server-managed columns.
  pub fn parse<E: Entity>(body: Value) -> Result<Self> {
    let Value::Object(fields) = body else {
      return Err(Error::NotAnObject);
    };
    for key in fields.keys() {
      check_writable::<E>(key)?;
    }
    Ok(Self { fields })
  }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  pub fn len(&self) -> usize { self.fields.len() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.fields.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn get(&self, name: &str) -> Option<&Value> { self.fields.get(name) }

  /// Apply the patch to `record` without persisting anything.
  ///
  /// The merged row must still decode into `E` and pass
  /// [`Entity::validate`]; this is how a caller checks a patch before
  /// handing it to a store.
  pub fn apply<E: Entity>(&self, record: &Record<E>) -> Result<Record<E>> {
    let Value::Object(mut merged) = serde_json::to_value(&record.data)? else {
      return Err(Error::NotAnObject);
    };
    for (key, value) in &self.fields {
      if column::is_system_column(key) {
        return Err(Error::ReadOnlyColumn(key.clone()));
      }
      merged.insert(key.clone(), value.clone());
    }

    let data: E = serde_json::from_value(Value::Object(merged))
      .map_err(|e| Error::validation(E::NAME, e.to_string()))?;
    data.validate()?;

    Ok(Record {
      id: record.id,
      created_at: record.created_at,
      updated_at: record.updated_at,
      data,
    })
  }
}
