//! Read models computed from several tables. Never stored.

use serde::{Deserialize, Serialize};

use crate::{academic::Enrollment, record::Record};

/// An enrollment with the names of the joined student and class, as shown in
/// enrollment lists. The names are `None` when the referenced row is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentDetail {
  #[serde(flatten)]
  pub enrollment:   Record<Enrollment>,
  pub ten_hoc_sinh: Option<String>,
  pub ten_lop_full: Option<String>,
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
  pub so_hoc_sinh:  u64,
  pub so_nhan_vien: u64,
  pub so_lop:       u64,
  pub so_ghi_danh:  u64,
  /// Sum of income entries.
  pub tong_thu:     f64,
  /// Sum of expense entries.
  pub tong_chi:     f64,
  /// `tong_thu - tong_chi`.
  pub so_du:        f64,
}
