//! Error type for `edu-store-sqlite`.

use edu_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] edu_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A value did not fit the storage class its column declares.
  #[error("cannot store {value} in {kind} column {column:?}")]
  Encode {
    column: String,
    kind:   String,
    value:  String,
  },

  /// A stored value could not be read back as its column's kind.
  #[error("cannot decode column {column:?}: {reason}")]
  Decode { column: String, reason: String },

  /// A row was written but could not be read back.
  #[error("{table} row {id} vanished after write")]
  Vanished { table: &'static str, id: uuid::Uuid },
}

impl StoreError for Error {
  fn is_constraint_violation(&self) -> bool {
    matches!(
      self,
      Error::Database(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)))
        if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
  }

  fn invalid_input(&self) -> Option<&edu_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
