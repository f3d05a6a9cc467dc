//! Grouping of configurable enum values for form drop-downs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{admin::Setting, record::Record};

/// All values of one enum category, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumCategory {
  pub category: String,
  pub values:   Vec<Record<Setting>>,
}

/// Group setting rows by category.
///
/// Categories appear in the order their first row appears in `rows`. Within
/// a category, values are sorted ascending by `order_num`; rows with equal
/// `order_num` keep their input order.
pub fn group_enums_by_category(
  rows: impl IntoIterator<Item = Record<Setting>>,
) -> Vec<EnumCategory> {
  let mut groups: Vec<EnumCategory> = Vec::new();
  let mut index: HashMap<String, usize> = HashMap::new();

  for row in rows {
    let slot = match index.get(&row.data.category) {
      Some(&i) => i,
      None => {
        index.insert(row.data.category.clone(), groups.len());
        groups.push(EnumCategory {
          category: row.data.category.clone(),
          values:   Vec::new(),
        });
        groups.len() - 1
      }
    };
    groups[slot].values.push(row);
  }

  for group in &mut groups {
    group.values.sort_by_key(|r| r.data.order_num);
  }
  groups
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;

  fn row(category: &str, value: &str, order_num: i64) -> Record<Setting> {
    let now = Utc::now();
    Record {
      id:         Uuid::new_v4(),
      created_at: now,
      updated_at: now,
      data:       Setting::new(category, value, order_num),
    }
  }

  fn values(group: &EnumCategory) -> Vec<&str> {
    group.values.iter().map(|r| r.data.value.as_str()).collect()
  }

  #[test]
  fn categories_keep_first_occurrence_order() {
    let grouped = group_enums_by_category(vec![
      row("B", "v3", 1),
      row("A", "v2", 2),
      row("B", "v4", 0),
      row("A", "v1", 1),
    ]);

    let cats: Vec<_> = grouped.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(cats, ["B", "A"]);
    assert_eq!(values(&grouped[0]), ["v4", "v3"]);
    assert_eq!(values(&grouped[1]), ["v1", "v2"]);
  }

  #[test]
  fn equal_order_numbers_are_stable() {
    let grouped = group_enums_by_category(vec![
      row("A", "first", 5),
      row("A", "second", 5),
      row("A", "zero", 0),
    ]);
    assert_eq!(values(&grouped[0]), ["zero", "first", "second"]);
  }

  #[test]
  fn empty_input_gives_no_groups() {
    assert!(group_enums_by_category(Vec::new()).is_empty());
  }
}
