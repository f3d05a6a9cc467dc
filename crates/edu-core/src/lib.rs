//! Core types and trait definitions for the education-center backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod academic;
pub mod admin;
pub mod column;
pub mod enums;
pub mod error;
pub mod file;
pub mod finance;
pub mod operations;
pub mod people;
pub mod query;
pub mod record;
pub mod store;
pub mod view;

mod rules;

pub use error::{Error, Result};
pub use record::{Entity, Record, TableInfo};

use academic::{Attendance, Class, Enrollment, Evaluation, TeachingSession};
use admin::{Session, Setting};
use file::File;
use finance::{Finance, Payroll};
use operations::{Asset, EmployeeClockIn, Event, Facility, Request, Task};
use people::{Contact, Employee, Student};

/// Every table of the schema.
pub const TABLES: &[TableInfo] = &[
  TableInfo::of::<Student>(),
  TableInfo::of::<Employee>(),
  TableInfo::of::<Contact>(),
  TableInfo::of::<Facility>(),
  TableInfo::of::<Class>(),
  TableInfo::of::<Enrollment>(),
  TableInfo::of::<TeachingSession>(),
  TableInfo::of::<Attendance>(),
  TableInfo::of::<Evaluation>(),
  TableInfo::of::<Finance>(),
  TableInfo::of::<Payroll>(),
  TableInfo::of::<Asset>(),
  TableInfo::of::<Task>(),
  TableInfo::of::<Event>(),
  TableInfo::of::<Request>(),
  TableInfo::of::<EmployeeClockIn>(),
  TableInfo::of::<File>(),
  TableInfo::of::<Setting>(),
  TableInfo::of::<Session>(),
];
