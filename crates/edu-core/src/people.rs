//! People: students, staff, and outside contacts (parents, partners,
//! recruitment candidates).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, column::Column, record::Entity, rules::require_text};

// ─── Student ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
  pub ten_hoc_sinh:  String,
  pub ngay_sinh:     Option<NaiveDate>,
  pub gioi_tinh:     Option<String>,
  pub ten_phu_huynh: Option<String>,
  pub sdt_phu_huynh: Option<String>,
  pub email:         Option<String>,
  pub dia_chi:       Option<String>,
  /// Facility the student is registered at.
  pub co_so_id:      Option<Uuid>,
  pub trang_thai:    Option<String>,
  pub ghi_chu:       Option<String>,
}

impl Student {
  pub fn named(ten_hoc_sinh: impl Into<String>) -> Self {
    Self {
      ten_hoc_sinh:  ten_hoc_sinh.into(),
      ngay_sinh:     None,
      gioi_tinh:     None,
      ten_phu_huynh: None,
      sdt_phu_huynh: None,
      email:         None,
      dia_chi:       None,
      co_so_id:      None,
      trang_thai:    None,
      ghi_chu:       None,
    }
  }
}

impl Entity for Student {
  const NAME: &'static str = "student";
  const TABLE: &'static str = "students";
  const PATH: &'static str = "students";
  const COLUMNS: &'static [Column] = &[
    Column::text("ten_hoc_sinh"),
    Column::date("ngay_sinh"),
    Column::text("gioi_tinh"),
    Column::text("ten_phu_huynh"),
    Column::text("sdt_phu_huynh"),
    Column::text("email"),
    Column::text("dia_chi"),
    Column::uuid("co_so_id"),
    Column::text("trang_thai"),
    Column::text("ghi_chu"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "ten_hoc_sinh", &self.ten_hoc_sinh)
  }
}

// ─── Employee ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
  pub ten_nhan_su:         String,
  pub bo_phan:             Option<String>,
  pub chuc_vu:             Option<String>,
  pub dien_thoai:          Option<String>,
  pub email:               Option<String>,
  pub ngay_sinh:           Option<NaiveDate>,
  pub co_so_id:            Option<Uuid>,
  pub tinh_trang_lao_dong: Option<String>,
  pub ghi_chu:             Option<String>,
}

impl Employee {
  pub fn named(ten_nhan_su: impl Into<String>) -> Self {
    Self {
      ten_nhan_su:         ten_nhan_su.into(),
      bo_phan:             None,
      chuc_vu:             None,
      dien_thoai:          None,
      email:               None,
      ngay_sinh:           None,
      co_so_id:            None,
      tinh_trang_lao_dong: None,
      ghi_chu:             None,
    }
  }
}

impl Entity for Employee {
  const NAME: &'static str = "employee";
  const TABLE: &'static str = "employees";
  const PATH: &'static str = "employees";
  const COLUMNS: &'static [Column] = &[
    Column::text("ten_nhan_su"),
    Column::text("bo_phan"),
    Column::text("chuc_vu"),
    Column::text("dien_thoai"),
    Column::text("email"),
    Column::date("ngay_sinh"),
    Column::uuid("co_so_id"),
    Column::text("tinh_trang_lao_dong"),
    Column::text("ghi_chu"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "ten_nhan_su", &self.ten_nhan_su)
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// Someone the center deals with who is neither a student nor staff:
/// parents, partners, and recruitment candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
  pub ten_lien_he:      String,
  pub loai_lien_he:     Option<String>,
  pub dien_thoai:       Option<String>,
  pub email:            Option<String>,
  /// Position applied for, when the contact is a candidate.
  pub vi_tri_ung_tuyen: Option<String>,
  pub nguon:            Option<String>,
  pub trang_thai:       Option<String>,
  pub ghi_chu:          Option<String>,
}

impl Entity for Contact {
  const NAME: &'static str = "contact";
  const TABLE: &'static str = "contacts";
  const PATH: &'static str = "contacts";
  const COLUMNS: &'static [Column] = &[
    Column::text("ten_lien_he"),
    Column::text("loai_lien_he"),
    Column::text("dien_thoai"),
    Column::text("email"),
    Column::text("vi_tri_ung_tuyen"),
    Column::text("nguon"),
    Column::text("trang_thai"),
    Column::text("ghi_chu"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "ten_lien_he", &self.ten_lien_he)
  }
}
