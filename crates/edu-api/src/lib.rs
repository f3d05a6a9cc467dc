//! JSON REST API for the education center.
//!
//! Exposes an axum [`Router`] backed by any [`edu_core::store::SchoolStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", edu_api::api_router(store.clone()))
//! ```

pub mod crud;
pub mod error;
pub mod reports;

use std::sync::Arc;

use axum::{Router, routing::get};
use edu_core::{
  academic::{Attendance, Class, Enrollment, Evaluation, TeachingSession},
  admin::{Session, Setting},
  file::File,
  finance::{Finance, Payroll},
  operations::{Asset, EmployeeClockIn, Event, Facility, Request, Task},
  people::{Contact, Employee, Student},
  store::SchoolStore,
};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: SchoolStore + 'static,
{
  Router::new()
    // People
    .merge(crud::routes::<Student, S>())
    .merge(crud::routes::<Employee, S>())
    .merge(crud::routes::<Contact, S>())
    // Academics
    .merge(crud::routes::<Class, S>())
    .merge(crud::routes::<Enrollment, S>())
    .merge(crud::routes::<TeachingSession, S>())
    .merge(crud::routes::<Attendance, S>())
    .merge(crud::routes::<Evaluation, S>())
    // Finance
    .merge(crud::routes::<Finance, S>())
    .merge(crud::routes::<Payroll, S>())
    // Operations
    .merge(crud::routes::<Facility, S>())
    .merge(crud::routes::<Asset, S>())
    .merge(crud::routes::<Task, S>())
    .merge(crud::routes::<Event, S>())
    .merge(crud::routes::<Request, S>())
    .merge(crud::routes::<EmployeeClockIn, S>())
    .merge(crud::routes::<File, S>())
    // Admin
    .merge(crud::routes::<Setting, S>())
    .merge(crud::routes::<Session, S>())
    // Reports
    .route("/settings/grouped", get(reports::grouped_settings::<S>))
    .route("/enrollments/details", get(reports::enrollment_details::<S>))
    .route("/files/by-owner", get(reports::files_by_owner::<S>))
    .route("/dashboard", get(reports::dashboard::<S>))
    .route("/health", get(reports::health))
    .with_state(store)
}

#[cfg(test)]
mod tests;
