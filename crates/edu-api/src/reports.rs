//! Read-only endpoints that span tables or reshape rows.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/settings/grouped` | Optional `?category=`; values grouped per category |
//! | `GET`  | `/enrollments/details` | Optional `?class_id=`; adds student and class names |
//! | `GET`  | `/files/by-owner` | `?entity_type=student\|employee\|class\|facility&entity_id=` |
//! | `GET`  | `/dashboard` | Headline counts and finance totals |
//! | `GET`  | `/health` | Always `{"status":"ok"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use edu_core::{
  Record,
  admin::Setting,
  enums::{EnumCategory, group_enums_by_category},
  file::{File, FileOwner},
  query::ListQuery,
  store::{Repository, SchoolStore},
  view::{Dashboard, EnrollmentDetail},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Settings ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GroupedParams {
  pub category: Option<String>,
}

/// `GET /settings/grouped[?category=<name>]`
pub async fn grouped_settings<S: SchoolStore>(
  State(store): State<Arc<S>>,
  params: Result<Query<GroupedParams>, QueryRejection>,
) -> Result<Json<Vec<EnumCategory>>, ApiError> {
  let Query(params) = params?;
  let mut query = ListQuery::new();
  if let Some(category) = params.category {
    query = query.filter::<Setting>("category", category)?;
  }
  let rows = Repository::<Setting>::list(&*store, &query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(group_enums_by_category(rows)))
}

// ─── Enrollments ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DetailParams {
  pub class_id: Option<Uuid>,
}

/// `GET /enrollments/details[?class_id=<id>]`
pub async fn enrollment_details<S: SchoolStore>(
  State(store): State<Arc<S>>,
  params: Result<Query<DetailParams>, QueryRejection>,
) -> Result<Json<Vec<EnrollmentDetail>>, ApiError> {
  let Query(params) = params?;
  let rows = store
    .enrollment_details(params.class_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}

// ─── Files ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OwnerParams {
  pub entity_type: String,
  pub entity_id:   Uuid,
}

/// `GET /files/by-owner?entity_type=<type>&entity_id=<id>`
///
/// An unknown `entity_type` is a 400, never an unfiltered listing.
pub async fn files_by_owner<S: SchoolStore>(
  State(store): State<Arc<S>>,
  params: Result<Query<OwnerParams>, QueryRejection>,
) -> Result<Json<Vec<Record<File>>>, ApiError> {
  let Query(params) = params?;
  let owner = FileOwner::parse(&params.entity_type)?;
  let query = ListQuery::new().filter::<File>(owner.column(), params.entity_id.to_string())?;
  let files = Repository::<File>::list(&*store, &query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(files))
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

/// `GET /dashboard`
pub async fn dashboard<S: SchoolStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Dashboard>, ApiError> {
  let summary = store.dashboard().await.map_err(ApiError::store)?;
  Ok(Json(summary))
}

/// `GET /health`
pub async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }
