//! Error type shared by every client call.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
  /// Rejected locally, before anything was sent.
  #[error(transparent)]
  Validation(#[from] edu_core::Error),

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The server answered with a non-success status.
  #[error("server returned {status}: {message}")]
  Status {
    status:  StatusCode,
    message: String,
  },
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
