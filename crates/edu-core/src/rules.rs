//! Small validation helpers shared by the entity modules.

use chrono::NaiveDate;

use crate::{Error, Result};

pub(crate) fn require_text(entity: &'static str, field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::validation(entity, format!("{field} must not be blank")));
  }
  Ok(())
}

pub(crate) fn non_negative(entity: &'static str, field: &str, value: f64) -> Result<()> {
  if !value.is_finite() || value < 0.0 {
    return Err(Error::validation(
      entity,
      format!("{field} must be a non-negative amount, got {value}"),
    ));
  }
  Ok(())
}

pub(crate) fn date_order(
  entity: &'static str,
  start: Option<NaiveDate>,
  end: Option<NaiveDate>,
) -> Result<()> {
  if let (Some(start), Some(end)) = (start, end)
    && end < start
  {
    return Err(Error::validation(
      entity,
      format!("end date {end} is before start date {start}"),
    ));
  }
  Ok(())
}
