//! Teaching: classes, enrollments, sessions, attendance and evaluations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{
  Error, Result,
  column::Column,
  record::Entity,
  rules::{date_order, non_negative, require_text},
};

// ─── Class ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
  /// Display name, e.g. `"IELTS 6.5 - K12 - Cơ sở 1"`.
  pub ten_lop_full:  String,
  /// Short code.
  pub ten_lop:       Option<String>,
  pub chuong_trinh:  Option<String>,
  pub co_so_id:      Option<Uuid>,
  /// Main teacher.
  pub gv_chinh_id:   Option<Uuid>,
  pub ngay_bat_dau:  Option<NaiveDate>,
  pub ngay_ket_thuc: Option<NaiveDate>,
  pub hoc_phi:       Option<f64>,
  pub tinh_trang:    Option<String>,
  pub ghi_chu:       Option<String>,
}

impl Class {
  pub fn named(ten_lop_full: impl Into<String>) -> Self {
    Self {
      ten_lop_full:  ten_lop_full.into(),
      ten_lop:       None,
      chuong_trinh:  None,
      co_so_id:      None,
      gv_chinh_id:   None,
      ngay_bat_dau:  None,
      ngay_ket_thuc: None,
      hoc_phi:       None,
      tinh_trang:    None,
      ghi_chu:       None,
    }
  }
}

impl Entity for Class {
  const NAME: &'static str = "class";
  const TABLE: &'static str = "classes";
  const PATH: &'static str = "classes";
  const COLUMNS: &'static [Column] = &[
    Column::text("ten_lop_full"),
    Column::text("ten_lop"),
    Column::text("chuong_trinh"),
    Column::uuid("co_so_id"),
    Column::uuid("gv_chinh_id"),
    Column::date("ngay_bat_dau"),
    Column::date("ngay_ket_thuc"),
    Column::real("hoc_phi"),
    Column::text("tinh_trang"),
    Column::text("ghi_chu"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "ten_lop_full", &self.ten_lop_full)?;
    date_order(Self::NAME, self.ngay_bat_dau, self.ngay_ket_thuc)?;
    if let Some(fee) = self.hoc_phi {
      non_negative(Self::NAME, "hoc_phi", fee)?;
    }
    Ok(())
  }
}

// ─── Enrollment ──────────────────────────────────────────────────────────────

/// A student's membership in a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
  pub hoc_sinh_id:  Uuid,
  pub lop_id:       Uuid,
  pub ngay_dang_ky: Option<NaiveDate>,
  pub trang_thai:   Option<String>,
  pub ghi_chu:      Option<String>,
}

impl Enrollment {
  pub fn new(hoc_sinh_id: Uuid, lop_id: Uuid) -> Self {
    Self {
      hoc_sinh_id,
      lop_id,
      ngay_dang_ky: None,
      trang_thai: None,
      ghi_chu: None,
    }
  }
}

impl Entity for Enrollment {
  const NAME: &'static str = "enrollment";
  const TABLE: &'static str = "enrollments";
  const PATH: &'static str = "enrollments";
  const COLUMNS: &'static [Column] = &[
    Column::uuid("hoc_sinh_id"),
    Column::uuid("lop_id"),
    Column::date("ngay_dang_ky"),
    Column::text("trang_thai"),
    Column::text("ghi_chu"),
  ];
}

// ─── Teaching session ────────────────────────────────────────────────────────

/// One scheduled lesson of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachingSession {
  pub lop_id:       Uuid,
  pub giao_vien_id: Option<Uuid>,
  pub ngay_hoc:     NaiveDate,
  /// Wall-clock start, `HH:MM`.
  pub gio_bat_dau:  Option<String>,
  pub gio_ket_thuc: Option<String>,
  pub noi_dung:     Option<String>,
  pub ghi_chu:      Option<String>,
}

impl Entity for TeachingSession {
  const NAME: &'static str = "teaching session";
  const TABLE: &'static str = "teaching_sessions";
  const PATH: &'static str = "teaching-sessions";
  const COLUMNS: &'static [Column] = &[
    Column::uuid("lop_id"),
    Column::uuid("giao_vien_id"),
    Column::date("ngay_hoc"),
    Column::text("gio_bat_dau"),
    Column::text("gio_ket_thuc"),
    Column::text("noi_dung"),
    Column::text("ghi_chu"),
  ];
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
  CoMat,
  DiMuon,
  VangCoPhep,
  VangKhongPhep,
}

/// A student's presence at one teaching session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
  pub buoi_hoc_id: Uuid,
  pub hoc_sinh_id: Uuid,
  pub trang_thai:  AttendanceStatus,
  pub ghi_chu:     Option<String>,
}

impl Entity for Attendance {
  const NAME: &'static str = "attendance";
  const TABLE: &'static str = "attendances";
  const PATH: &'static str = "attendances";
  const COLUMNS: &'static [Column] = &[
    Column::uuid("buoi_hoc_id"),
    Column::uuid("hoc_sinh_id"),
    Column::text("trang_thai"),
    Column::text("ghi_chu"),
  ];
}

// ─── Evaluation ──────────────────────────────────────────────────────────────

pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
  pub hoc_sinh_id:   Uuid,
  pub lop_id:        Option<Uuid>,
  pub giao_vien_id:  Option<Uuid>,
  pub ky_danh_gia:   Option<String>,
  pub ngay_danh_gia: Option<NaiveDate>,
  /// On a 0–10 scale.
  pub diem:          Option<f64>,
  pub nhan_xet:      Option<String>,
}

impl Entity for Evaluation {
  const NAME: &'static str = "evaluation";
  const TABLE: &'static str = "evaluations";
  const PATH: &'static str = "evaluations";
  const COLUMNS: &'static [Column] = &[
    Column::uuid("hoc_sinh_id"),
    Column::uuid("lop_id"),
    Column::uuid("giao_vien_id"),
    Column::text("ky_danh_gia"),
    Column::date("ngay_danh_gia"),
    Column::real("diem"),
    Column::text("nhan_xet"),
  ];

  fn validate(&self) -> Result<()> {
    match self.diem {
      Some(d) if !(0.0..=MAX_SCORE).contains(&d) => Err(Error::validation(
        Self::NAME,
        format!("diem must be between 0 and {MAX_SCORE}, got {d}"),
      )),
      _ => Ok(()),
    }
  }
}
