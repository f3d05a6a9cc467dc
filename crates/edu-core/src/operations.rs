//! Day-to-day operations: facilities, assets, tasks, events, internal
//! requests and staff clock-ins.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  column::Column,
  record::Entity,
  rules::{date_order, non_negative, require_text},
};

// ─── Facility ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
  pub ten_co_so:  String,
  pub dia_chi:    Option<String>,
  pub dien_thoai: Option<String>,
  pub email:      Option<String>,
  pub quan_ly_id: Option<Uuid>,
  pub trang_thai: Option<String>,
  pub ghi_chu:    Option<String>,
}

impl Facility {
  pub fn named(ten_co_so: impl Into<String>) -> Self {
    Self {
      ten_co_so:  ten_co_so.into(),
      dia_chi:    None,
      dien_thoai: None,
      email:      None,
      quan_ly_id: None,
      trang_thai: None,
      ghi_chu:    None,
    }
  }
}

impl Entity for Facility {
  const NAME: &'static str = "facility";
  const TABLE: &'static str = "facilities";
  const PATH: &'static str = "facilities";
  const COLUMNS: &'static [Column] = &[
    Column::text("ten_co_so"),
    Column::text("dia_chi"),
    Column::text("dien_thoai"),
    Column::text("email"),
    Column::uuid("quan_ly_id"),
    Column::text("trang_thai"),
    Column::text("ghi_chu"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "ten_co_so", &self.ten_co_so)
  }
}

// ─── Asset ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
  pub ten_tai_san:  String,
  pub loai_tai_san: Option<String>,
  #[serde(default = "one")]
  pub so_luong:     i64,
  pub don_gia:      Option<f64>,
  pub co_so_id:     Option<Uuid>,
  pub ngay_mua:     Option<NaiveDate>,
  pub tinh_trang:   Option<String>,
  pub ghi_chu:      Option<String>,
}

fn one() -> i64 { 1 }

impl Entity for Asset {
  const NAME: &'static str = "asset";
  const TABLE: &'static str = "assets";
  const PATH: &'static str = "assets";
  const COLUMNS: &'static [Column] = &[
    Column::text("ten_tai_san"),
    Column::text("loai_tai_san"),
    Column::integer("so_luong"),
    Column::real("don_gia"),
    Column::uuid("co_so_id"),
    Column::date("ngay_mua"),
    Column::text("tinh_trang"),
    Column::text("ghi_chu"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "ten_tai_san", &self.ten_tai_san)?;
    if self.so_luong < 0 {
      return Err(Error::validation(Self::NAME, "so_luong must not be negative"));
    }
    if let Some(price) = self.don_gia {
      non_negative(Self::NAME, "don_gia", price)?;
    }
    Ok(())
  }
}

// ─── Task ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
  pub tieu_de:            String,
  pub mo_ta:              Option<String>,
  pub nguoi_phu_trach_id: Option<Uuid>,
  pub han_hoan_thanh:     Option<NaiveDate>,
  pub muc_do_uu_tien:     Option<String>,
  pub trang_thai:         Option<String>,
}

impl Entity for Task {
  const NAME: &'static str = "task";
  const TABLE: &'static str = "tasks";
  const PATH: &'static str = "tasks";
  const COLUMNS: &'static [Column] = &[
    Column::text("tieu_de"),
    Column::text("mo_ta"),
    Column::uuid("nguoi_phu_trach_id"),
    Column::date("han_hoan_thanh"),
    Column::text("muc_do_uu_tien"),
    Column::text("trang_thai"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "tieu_de", &self.tieu_de)
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
  pub ten_su_kien:   String,
  pub loai_su_kien:  Option<String>,
  pub ngay_bat_dau:  Option<NaiveDate>,
  pub ngay_ket_thuc: Option<NaiveDate>,
  pub dia_diem:      Option<String>,
  pub mo_ta:         Option<String>,
  pub trang_thai:    Option<String>,
}

impl Entity for Event {
  const NAME: &'static str = "event";
  const TABLE: &'static str = "events";
  const PATH: &'static str = "events";
  const COLUMNS: &'static [Column] = &[
    Column::text("ten_su_kien"),
    Column::text("loai_su_kien"),
    Column::date("ngay_bat_dau"),
    Column::date("ngay_ket_thuc"),
    Column::text("dia_diem"),
    Column::text("mo_ta"),
    Column::text("trang_thai"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "ten_su_kien", &self.ten_su_kien)?;
    date_order(Self::NAME, self.ngay_bat_dau, self.ngay_ket_thuc)
  }
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// An internal request (leave, purchase, ...) awaiting approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
  pub loai_yeu_cau:     String,
  pub nguoi_de_xuat_id: Option<Uuid>,
  pub noi_dung:         Option<String>,
  pub ngay_de_xuat:     Option<NaiveDate>,
  pub nguoi_duyet_id:   Option<Uuid>,
  pub trang_thai:       Option<String>,
}

impl Entity for Request {
  const NAME: &'static str = "request";
  const TABLE: &'static str = "requests";
  const PATH: &'static str = "requests";
  const COLUMNS: &'static [Column] = &[
    Column::text("loai_yeu_cau"),
    Column::uuid("nguoi_de_xuat_id"),
    Column::text("noi_dung"),
    Column::date("ngay_de_xuat"),
    Column::uuid("nguoi_duyet_id"),
    Column::text("trang_thai"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "loai_yeu_cau", &self.loai_yeu_cau)
  }
}

// ─── Employee clock-in ───────────────────────────────────────────────────────

/// A staff member's arrival and departure on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeClockIn {
  pub nhan_vien_id: Uuid,
  pub ngay:         NaiveDate,
  /// `HH:MM`.
  pub gio_vao:      Option<String>,
  pub gio_ra:       Option<String>,
  pub ghi_chu:      Option<String>,
}

impl Entity for EmployeeClockIn {
  const NAME: &'static str = "employee clock-in";
  const TABLE: &'static str = "employee_clock_ins";
  const PATH: &'static str = "employee-clock-ins";
  const COLUMNS: &'static [Column] = &[
    Column::uuid("nhan_vien_id"),
    Column::date("ngay"),
    Column::text("gio_vao"),
    Column::text("gio_ra"),
    Column::text("ghi_chu"),
  ];
  const FILTER_ALIASES: &'static [(&'static str, &'static str)] =
    &[("employeeId", "nhan_vien_id"), ("date", "ngay")];
}
