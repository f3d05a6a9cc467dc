//! [`SqliteStore`] — the SQLite implementation of the store traits.

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use edu_core::{
  Entity, Record,
  academic::Enrollment,
  query::{ListQuery, Patch},
  store::{Repository, SchoolStore, Store},
  view::{Dashboard, EnrollmentDetail},
};
use rusqlite::{TransactionBehavior, types::Value as SqlValue};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    decode_record, encode_data, encode_dt, encode_uuid, encode_value, row_columns,
    select_list,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The school database backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT` over full rows of `E` and decode them.
  async fn select<E: Entity>(&self, sql: String, params: Vec<SqlValue>) -> Result<Vec<Record<E>>> {
    let width = row_columns::<E>().count();
    let rows = self
      .conn
      .call(move |conn| Ok(query_rows(conn, &sql, params, width)?))
      .await?;
    rows.into_iter().map(decode_record::<E>).collect()
  }

  /// Column names of `table` as the database sees them.
  #[cfg(test)]
  pub(crate) async fn table_columns(&self, table: &'static str) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let names = stmt
          .query_map([], |row| row.get::<_, String>(1))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
      })
      .await?;
    Ok(names)
  }
}

/// Execute `sql` and collect the first `width` columns of every row.
fn query_rows(
  conn: &rusqlite::Connection,
  sql: &str,
  params: Vec<SqlValue>,
  width: usize,
) -> rusqlite::Result<Vec<Vec<SqlValue>>> {
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt
    .query_map(rusqlite::params_from_iter(params), |row| {
      (0..width).map(|i| row.get::<_, SqlValue>(i)).collect()
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Check `patch` against `current` and build the `UPDATE` for it.
fn update_statement<E: Entity>(
  current: &Record<E>,
  patch: &Patch,
  updated_at: String,
  id_text: &str,
) -> Result<(String, Vec<SqlValue>)> {
  patch.apply(current)?;

  let mut sets = Vec::with_capacity(patch.len() + 1);
  let mut params = Vec::with_capacity(patch.len() + 2);
  for (name, value) in patch.iter() {
    let column = E::COLUMNS.iter().find(|c| c.name == name).ok_or_else(|| {
      edu_core::Error::UnknownColumn {
        entity: E::NAME,
        column: name.to_owned(),
      }
    })?;
    params.push(encode_value(column, value)?);
    sets.push(format!("{} = ?{}", column.name, params.len()));
  }
  params.push(SqlValue::Text(updated_at));
  sets.push(format!("updated_at = ?{}", params.len()));
  params.push(SqlValue::Text(id_text.to_owned()));

  let sql = format!(
    "UPDATE {} SET {} WHERE id = ?{}",
    E::TABLE,
    sets.join(", "),
    params.len()
  );
  Ok((sql, params))
}

/// `LIMIT`/`OFFSET` operand; SQLite integers are signed.
fn sql_count(key: &str, n: usize) -> Result<i64> {
  i64::try_from(n).map_err(|e| {
    Error::Core(edu_core::Error::InvalidFilter {
      column: key.to_owned(),
      value:  n.to_string(),
      reason: e.to_string(),
    })
  })
}

fn placeholders(n: usize) -> String {
  (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}

fn now() -> chrono::DateTime<Utc> {
  // Stored timestamps keep microseconds; truncate so the record returned by
  // a write equals the one read back later.
  Utc::now().trunc_subsecs(6)
}

// ─── Repository impl ─────────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = Error;
}

impl<E: Entity> Repository<E> for SqliteStore {
  async fn list(&self, query: &ListQuery) -> Result<Vec<Record<E>>> {
    let mut sql = format!("SELECT {} FROM {}", select_list::<E>(None), E::TABLE);
    let mut params = Vec::new();

    let mut conds = Vec::with_capacity(query.filters.len());
    for filter in &query.filters {
      if filter.value.is_null() {
        conds.push(format!("{} IS NULL", filter.column.name));
      } else {
        params.push(encode_value(&filter.column, &filter.value)?);
        conds.push(format!("{} = ?{}", filter.column.name, params.len()));
      }
    }
    if !conds.is_empty() {
      sql.push_str(" WHERE ");
      sql.push_str(&conds.join(" AND "));
    }

    let (order_col, direction) = match query.sort {
      Some(s) => (s.column.name, if s.descending { "DESC" } else { "ASC" }),
      None => ("created_at", "ASC"),
    };
    sql.push_str(&format!(" ORDER BY {order_col} {direction}, rowid ASC"));

    if query.limit.is_some() || query.offset.is_some() {
      // SQLite needs a LIMIT for OFFSET; -1 means unbounded.
      let limit = query.limit.map_or(Ok(-1), |l| sql_count("limit", l))?;
      let offset = sql_count("offset", query.offset.unwrap_or(0))?;
      params.push(SqlValue::Integer(limit));
      params.push(SqlValue::Integer(offset));
      sql.push_str(&format!(" LIMIT ?{} OFFSET ?{}", params.len() - 1, params.len()));
    }

    self.select::<E>(sql, params).await
  }

  async fn get(&self, id: Uuid) -> Result<Option<Record<E>>> {
    let sql = format!(
      "SELECT {} FROM {} WHERE id = ?1",
      select_list::<E>(None),
      E::TABLE
    );
    let mut rows = self
      .select::<E>(sql, vec![SqlValue::Text(encode_uuid(id))])
      .await?;
    Ok(rows.pop())
  }

  async fn create(&self, data: E) -> Result<Record<E>> {
    data.validate()?;

    let id = Uuid::new_v4();
    let at = encode_dt(now());

    let mut values = vec![
      SqlValue::Text(encode_uuid(id)),
      SqlValue::Text(at.clone()),
      SqlValue::Text(at),
    ];
    values.extend(encode_data(&data)?);

    let names = row_columns::<E>().map(|c| c.name).collect::<Vec<_>>().join(", ");
    let insert = format!(
      "INSERT INTO {} ({names}) VALUES ({})",
      E::TABLE,
      placeholders(values.len())
    );
    let select = format!(
      "SELECT {} FROM {} WHERE id = ?1",
      select_list::<E>(None),
      E::TABLE
    );
    let width = row_columns::<E>().count();
    let id_text = encode_uuid(id);

    let rows = self
      .conn
      .call(move |conn| {
        conn.execute(&insert, rusqlite::params_from_iter(values))?;
        Ok(query_rows(conn, &select, vec![SqlValue::Text(id_text)], width)?)
      })
      .await?;

    tracing::debug!(table = E::TABLE, %id, "row created");
    rows
      .into_iter()
      .next()
      .map(decode_record::<E>)
      .transpose()?
      .ok_or(Error::Vanished { table: E::TABLE, id })
  }

  async fn update(&self, id: Uuid, patch: &Patch) -> Result<Option<Record<E>>> {
    let patch = patch.clone();
    let select = format!(
      "SELECT {} FROM {} WHERE id = ?1",
      select_list::<E>(None),
      E::TABLE
    );
    let width = row_columns::<E>().count();
    let id_text = encode_uuid(id);
    let updated_at = encode_dt(now());

    // Read, check and write under one write lock so concurrent patches
    // cannot combine into a row that fails validation.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let key = || vec![SqlValue::Text(id_text.clone())];

        let Some(row) = query_rows(&tx, &select, key(), width)?.into_iter().next() else {
          return Ok(Ok(None));
        };
        let (update, params) = match decode_record::<E>(row)
          .and_then(|current| update_statement(&current, &patch, updated_at, &id_text))
        {
          Ok(statement) => statement,
          Err(e) => return Ok(Err(e)),
        };

        tx.execute(&update, rusqlite::params_from_iter(params))?;
        let rows = query_rows(&tx, &select, key(), width)?;
        tx.commit()?;
        Ok(Ok(rows.into_iter().next()))
      })
      .await?;

    let row = outcome?;
    tracing::debug!(table = E::TABLE, %id, found = row.is_some(), "row updated");
    row.map(decode_record::<E>).transpose()
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
    let id_text = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![id_text])?))
      .await?;

    tracing::debug!(table = E::TABLE, %id, removed, "row deleted");
    Ok(removed > 0)
  }
}

// ─── SchoolStore impl ────────────────────────────────────────────────────────

impl SchoolStore for SqliteStore {
  async fn enrollment_details(&self, class_id: Option<Uuid>) -> Result<Vec<EnrollmentDetail>> {
    let width = row_columns::<Enrollment>().count();
    let mut sql = format!(
      "SELECT {}, s.ten_hoc_sinh, c.ten_lop_full
       FROM enrollments e
       LEFT JOIN students s ON s.id = e.hoc_sinh_id
       LEFT JOIN classes  c ON c.id = e.lop_id",
      select_list::<Enrollment>(Some("e"))
    );
    let mut params = Vec::new();
    if let Some(class_id) = class_id {
      sql.push_str(" WHERE e.lop_id = ?1");
      params.push(SqlValue::Text(encode_uuid(class_id)));
    }
    sql.push_str(" ORDER BY e.created_at ASC, e.rowid ASC");

    let rows = self
      .conn
      .call(move |conn| Ok(query_rows(conn, &sql, params, width + 2)?))
      .await?;

    rows
      .into_iter()
      .map(|mut row| {
        let names = row.split_off(width);
        let mut names = names.into_iter().map(|v| match v {
          SqlValue::Text(s) => Some(s),
          _ => None,
        });
        Ok(EnrollmentDetail {
          enrollment:   decode_record::<Enrollment>(row)?,
          ten_hoc_sinh: names.next().flatten(),
          ten_lop_full: names.next().flatten(),
        })
      })
      .collect()
  }

  async fn dashboard(&self) -> Result<Dashboard> {
    let (students, employees, classes, enrollments, income, expense) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT
             (SELECT COUNT(*) FROM students),
             (SELECT COUNT(*) FROM employees),
             (SELECT COUNT(*) FROM classes),
             (SELECT COUNT(*) FROM enrollments),
             (SELECT COALESCE(SUM(so_tien), 0.0) FROM finances WHERE loai_thu_chi = 'thu'),
             (SELECT COALESCE(SUM(so_tien), 0.0) FROM finances WHERE loai_thu_chi = 'chi')",
          [],
          |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, i64>(1)?,
              row.get::<_, i64>(2)?,
              row.get::<_, i64>(3)?,
              row.get::<_, f64>(4)?,
              row.get::<_, f64>(5)?,
            ))
          },
        )?)
      })
      .await?;

    Ok(Dashboard {
      so_hoc_sinh:  students as u64,
      so_nhan_vien: employees as u64,
      so_lop:       classes as u64,
      so_ghi_danh:  enrollments as u64,
      tong_thu:     income,
      tong_chi:     expense,
      so_du:        income - expense,
    })
  }
}
