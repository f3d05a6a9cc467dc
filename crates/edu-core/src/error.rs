//! Error types for `edu-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A record failed an entity-level rule or could not be decoded into its
  /// entity type.
  #[error("invalid {entity}: {message}")]
  Validation {
    entity:  &'static str,
    message: String,
  },

  #[error("{entity} has no column {column:?}")]
  UnknownColumn {
    entity: &'static str,
    column: String,
  },

  #[error("column {0:?} is managed by the server and cannot be written")]
  ReadOnlyColumn(String),

  #[error("invalid value {value:?} for filter {column:?}: {reason}")]
  InvalidFilter {
    column: String,
    value:  String,
    reason: String,
  },

  #[error("unknown entity type: {0:?}")]
  UnknownEntityType(String),

  #[error("expected a JSON object")]
  NotAnObject,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub fn validation(entity: &'static str, message: impl Into<String>) -> Self {
    Self::Validation { entity, message: message.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
