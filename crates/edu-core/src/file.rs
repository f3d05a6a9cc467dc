//! Uploaded documents and the entity each one is attached to.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{
  Error, Result,
  column::Column,
  record::Entity,
  rules::require_text,
};

/// The kinds of entity a file can be attached to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FileOwner {
  Student,
  Employee,
  Class,
  Facility,
}

impl FileOwner {
  /// Parse an owner type as sent by clients. Anything that is not a known
  /// owner is an error rather than a silent fallback.
  pub fn parse(entity_type: &str) -> Result<Self> {
    entity_type
      .parse()
      .map_err(|_| Error::UnknownEntityType(entity_type.to_owned()))
  }

  /// The `files` column holding this owner's id.
  pub fn column(self) -> &'static str {
    match self {
      Self::Student => "hoc_sinh_id",
      Self::Employee => "nhan_vien_id",
      Self::Class => "lop_id",
      Self::Facility => "co_so_id",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
  pub ten_file:     String,
  /// MIME type or extension.
  pub loai_file:    Option<String>,
  /// Storage URL or path.
  pub duong_dan:    String,
  pub kich_thuoc:   Option<i64>,
  pub hoc_sinh_id:  Option<Uuid>,
  pub nhan_vien_id: Option<Uuid>,
  pub lop_id:       Option<Uuid>,
  pub co_so_id:     Option<Uuid>,
  pub ghi_chu:      Option<String>,
}

impl File {
  pub fn new(ten_file: impl Into<String>, duong_dan: impl Into<String>) -> Self {
    Self {
      ten_file:     ten_file.into(),
      loai_file:    None,
      duong_dan:    duong_dan.into(),
      kich_thuoc:   None,
      hoc_sinh_id:  None,
      nhan_vien_id: None,
      lop_id:       None,
      co_so_id:     None,
      ghi_chu:      None,
    }
  }

  /// Attach the file to `owner`, clearing any previous owner.
  pub fn attach(mut self, owner: FileOwner, id: Uuid) -> Self {
    self.hoc_sinh_id = None;
    self.nhan_vien_id = None;
    self.lop_id = None;
    self.co_so_id = None;
    match owner {
      FileOwner::Student => self.hoc_sinh_id = Some(id),
      FileOwner::Employee => self.nhan_vien_id = Some(id),
      FileOwner::Class => self.lop_id = Some(id),
      FileOwner::Facility => self.co_so_id = Some(id),
    }
    self
  }

  /// The owner this file is attached to, if any.
  pub fn owner(&self) -> Option<(FileOwner, Uuid)> {
    [
      (FileOwner::Student, self.hoc_sinh_id),
      (FileOwner::Employee, self.nhan_vien_id),
      (FileOwner::Class, self.lop_id),
      (FileOwner::Facility, self.co_so_id),
    ]
    .into_iter()
    .find_map(|(owner, id)| id.map(|id| (owner, id)))
  }
}

impl Entity for File {
  const NAME: &'static str = "file";
  const TABLE: &'static str = "files";
  const PATH: &'static str = "files";
  const COLUMNS: &'static [Column] = &[
    Column::text("ten_file"),
    Column::text("loai_file"),
    Column::text("duong_dan"),
    Column::integer("kich_thuoc"),
    Column::uuid("hoc_sinh_id"),
    Column::uuid("nhan_vien_id"),
    Column::uuid("lop_id"),
    Column::uuid("co_so_id"),
    Column::text("ghi_chu"),
  ];

  fn validate(&self) -> Result<()> {
    require_text(Self::NAME, "ten_file", &self.ten_file)?;
    require_text(Self::NAME, "duong_dan", &self.duong_dan)?;
    let owners = [self.hoc_sinh_id, self.nhan_vien_id, self.lop_id, self.co_so_id]
      .iter()
      .filter(|id| id.is_some())
      .count();
    if owners > 1 {
      return Err(Error::validation(
        Self::NAME,
        "a file can be attached to at most one owner",
      ));
    }
    Ok(())
  }
}
