//! Money: income/expense ledger entries and monthly payroll.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{
  Error, Result,
  column::Column,
  record::Entity,
  rules::non_negative,
};

// ─── Finance ─────────────────────────────────────────────────────────────────

/// Direction of a ledger entry.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FinanceKind {
  /// Income.
  Thu,
  /// Expense.
  Chi,
}

/// One income or expense entry.
///
/// `loai_thu_chi` is optional at the type level so that an incomplete form
/// can be represented, but [`Entity::validate`] refuses to accept it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finance {
  #[serde(default)]
  pub loai_thu_chi:         Option<FinanceKind>,
  /// Free-form category, e.g. `hoc_phi`, `luong`, `mua_sam`.
  pub loai_giao_dich:       Option<String>,
  pub so_tien:              f64,
  pub ngay:                 Option<NaiveDate>,
  pub dien_giai:            Option<String>,
  pub hoc_sinh_id:          Option<Uuid>,
  pub nhan_vien_id:         Option<Uuid>,
  pub co_so_id:             Option<Uuid>,
  pub hinh_thuc_thanh_toan: Option<String>,
  pub tinh_trang:           Option<String>,
}

impl Finance {
  pub fn new(loai_thu_chi: FinanceKind, so_tien: f64) -> Self {
    Self {
      loai_thu_chi:         Some(loai_thu_chi),
      loai_giao_dich:       None,
      so_tien,
      ngay:                 None,
      dien_giai:            None,
      hoc_sinh_id:          None,
      nhan_vien_id:         None,
      co_so_id:             None,
      hinh_thuc_thanh_toan: None,
      tinh_trang:           None,
    }
  }
}

impl Entity for Finance {
  const NAME: &'static str = "finance";
  const TABLE: &'static str = "finances";
  const PATH: &'static str = "finances";
  const COLUMNS: &'static [Column] = &[
    Column::text("loai_thu_chi"),
    Column::text("loai_giao_dich"),
    Column::real("so_tien"),
    Column::date("ngay"),
    Column::text("dien_giai"),
    Column::uuid("hoc_sinh_id"),
    Column::uuid("nhan_vien_id"),
    Column::uuid("co_so_id"),
    Column::text("hinh_thuc_thanh_toan"),
    Column::text("tinh_trang"),
  ];

  fn validate(&self) -> Result<()> {
    if self.loai_thu_chi.is_none() {
      return Err(Error::validation(
        Self::NAME,
        "loai_thu_chi is required (thu or chi)",
      ));
    }
    non_negative(Self::NAME, "so_tien", self.so_tien)
  }
}

// ─── Payroll ─────────────────────────────────────────────────────────────────

/// An employee's pay for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payroll {
  pub nhan_vien_id: Uuid,
  pub thang:        i64,
  pub nam:          i64,
  pub luong_co_ban: f64,
  #[serde(default)]
  pub phu_cap:      f64,
  #[serde(default)]
  pub thuong:       f64,
  #[serde(default)]
  pub khau_tru:     f64,
  pub trang_thai:   Option<String>,
  pub ghi_chu:      Option<String>,
}

impl Payroll {
  /// Net pay: base salary plus allowance and bonus, minus deductions.
  pub fn thuc_linh(&self) -> f64 {
    self.luong_co_ban + self.phu_cap + self.thuong - self.khau_tru
  }
}

impl Entity for Payroll {
  const NAME: &'static str = "payroll";
  const TABLE: &'static str = "payrolls";
  const PATH: &'static str = "payrolls";
  const COLUMNS: &'static [Column] = &[
    Column::uuid("nhan_vien_id"),
    Column::integer("thang"),
    Column::integer("nam"),
    Column::real("luong_co_ban"),
    Column::real("phu_cap"),
    Column::real("thuong"),
    Column::real("khau_tru"),
    Column::text("trang_thai"),
    Column::text("ghi_chu"),
  ];

  fn validate(&self) -> Result<()> {
    if !(1..=12).contains(&self.thang) {
      return Err(Error::validation(
        Self::NAME,
        format!("thang must be between 1 and 12, got {}", self.thang),
      ));
    }
    non_negative(Self::NAME, "luong_co_ban", self.luong_co_ban)?;
    non_negative(Self::NAME, "phu_cap", self.phu_cap)?;
    non_negative(Self::NAME, "thuong", self.thuong)?;
    non_negative(Self::NAME, "khau_tru", self.khau_tru)
  }
}
