//! Administration tables: configurable enum values and login sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{Result, column::Column, record::Entity, rules::require_text};

// ─── Setting ─────────────────────────────────────────────────────────────────

/// One selectable value of a configurable enum (e.g. category
/// `trang_thai_hoc_sinh`, value `dang_hoc`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
  pub category:  String,
  pub value:     String,
  /// Position within the category; lower sorts first.
  #[serde(default)]
  pub order_num: i64,
  pub mo_ta:     Option<String>,
  #[serde(default = "active")]
  pub hoat_dong: bool,
}

fn active() -> bool { true }

impl Setting {
  pub fn new(category: impl Into<String>, value: impl Into<String>, order_num: i64) -> Self {
    Self {
      category: category.into(),
      value: value.into(),
      order_num,
      mo_ta: None,
      hoat_dong: true,
    }
  }
}

impl Entity for Setting {
  const NAME: &'static str = "setting";
  const TABLE: &'static str = "settings";
  const PATH: &'static str = "settings";
  const COLUMNS: &'static [Column] = &[
    Column::text("category"),
    Column::text("value"),
    Column::integer("order_num"),
    Column::text("mo_ta"),
    Column::bool("hoat_dong"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "category", &self.category)?;
    require_text(Self::NAME, "value", &self.value)
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// A staff login session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  pub nhan_vien_id: Option<Uuid>,
  pub token:        String,
  pub het_han:      Option<DateTime<Utc>>,
  /// Client metadata (user agent, IP, ...).
  pub thong_tin:    Option<Value>,
}

impl Session {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.het_han.is_some_and(|exp| exp <= now)
  }
}

impl Entity for Session {
  const NAME: &'static str = "session";
  const TABLE: &'static str = "sessions";
  const PATH: &'static str = "sessions";
  const COLUMNS: &'static [Column] = &[
    Column::uuid("nhan_vien_id"),
    Column::text("token"),
    Column::timestamp("het_han"),
    Column::json("thong_tin"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "token", &self.token)
  }
}
