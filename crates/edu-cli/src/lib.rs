//! Typed client for the education-center API, used by the `edu` binary.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiConfig, Service};
pub use error::{ClientError, Result};

#[cfg(test)]
mod tests;
