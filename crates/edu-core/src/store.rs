//! Storage traits.
//!
//! Implemented by storage backends (e.g. `edu-store-sqlite`). The HTTP layer
//! depends on these traits, never on a concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  academic::{Attendance, Class, Enrollment, Evaluation, TeachingSession},
  admin::{Session, Setting},
  file::File,
  finance::{Finance, Payroll},
  operations::{Asset, EmployeeClockIn, Event, Facility, Request, Task},
  people::{Contact, Employee, Student},
  query::{ListQuery, Patch},
  record::{Entity, Record},
  view::{Dashboard, EnrollmentDetail},
};

/// Errors surfaced by a store backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when the database refused the write because of a relational
  /// constraint (foreign key, uniqueness, not-null).
  fn is_constraint_violation(&self) -> bool;

  /// The rule or column error when the store refused a write because the
  /// resulting row would not be a valid entity.
  fn invalid_input(&self) -> Option<&crate::Error>;
}

/// A storage backend. Carries the backend's error type so every
/// [`Repository`] implemented on it shares one.
pub trait Store: Send + Sync {
  type Error: StoreError;
}

/// Typed CRUD access to the table of `E`.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait Repository<E: Entity>: Store {
  /// Rows matching `query`; by default oldest first.
  fn list<'a>(
    &'a self,
    query: &'a ListQuery,
  ) -> impl Future<Output = Result<Vec<Record<E>>, Self::Error>> + Send + 'a;

  /// Retrieve a row by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Record<E>>, Self::Error>> + Send + '_;

  /// Persist a new row. The store assigns `id`, `created_at` and
  /// `updated_at`.
  ///
  /// `data` must pass [`Entity::validate`]; otherwise nothing is written and
  /// the error's [`StoreError::invalid_input`] is set.
  fn create(
    &self,
    data: E,
  ) -> impl Future<Output = Result<Record<E>, Self::Error>> + Send + '_;

  /// Overwrite the patched columns and bump `updated_at`. Returns `None` if
  /// the row does not exist.
  ///
  /// The patch is applied to the stored row with [`Patch::apply`] in the
  /// same transaction as the write, so the result always passes
  /// [`Entity::validate`]. A patch that would break a rule writes nothing
  /// and the error's [`StoreError::invalid_input`] is set.
  fn update<'a>(
    &'a self,
    id: Uuid,
    patch: &'a Patch,
  ) -> impl Future<Output = Result<Option<Record<E>>, Self::Error>> + Send + 'a;

  /// Remove a row. Returns `false` if it did not exist.
  fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

/// The complete school schema: one repository per table plus the
/// cross-table read models.
pub trait SchoolStore:
  Repository<Student>
  + Repository<Employee>
  + Repository<Contact>
  + Repository<Facility>
  + Repository<Class>
  + Repository<Enrollment>
  + Repository<TeachingSession>
  + Repository<Attendance>
  + Repository<Evaluation>
  + Repository<Finance>
  + Repository<Payroll>
  + Repository<Asset>
  + Repository<Task>
  + Repository<Event>
  + Repository<Request>
  + Repository<EmployeeClockIn>
  + Repository<File>
  + Repository<Setting>
  + Repository<Session>
{
  /// Enrollments joined with their student and class names, optionally
  /// restricted to one class.
  fn enrollment_details(
    &self,
    class_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<EnrollmentDetail>, Self::Error>> + Send + '_;

  fn dashboard(&self) -> impl Future<Output = Result<Dashboard, Self::Error>> + Send + '_;
}
