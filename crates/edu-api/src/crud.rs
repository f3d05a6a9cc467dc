//! Generic CRUD handlers, instantiated once per entity.
//!
//! | Method         | Path            | Notes |
//! |----------------|-----------------|-------|
//! | `GET`          | `/<path>`       | Column filters plus `sort`, `limit`, `offset` |
//! | `POST`         | `/<path>`       | Body: entity columns; returns 201 + record |
//! | `GET`          | `/<path>/:id`   | 404 if not found |
//! | `PATCH`, `PUT` | `/<path>/:id`   | Body: subset of columns; 404 if not found |
//! | `DELETE`       | `/<path>/:id`   | 204, or 404 if not found |

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  routing::get,
};
use edu_core::{
  Entity, Record,
  query::{ListQuery, Patch},
  record::parse_draft,
  store::Repository,
};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;

/// Routes for one entity, mounted at `/<E::PATH>`.
pub fn routes<E, S>() -> Router<Arc<S>>
where
  E: Entity,
  S: Repository<E> + 'static,
{
  let collection = format!("/{}", E::PATH);
  let item = format!("/{}/{{id}}", E::PATH);

  Router::new()
    .route(&collection, get(list::<E, S>).post(create::<E, S>))
    .route(
      &item,
      get(get_one::<E, S>)
        .patch(update::<E, S>)
        .put(update::<E, S>)
        .delete(delete::<E, S>),
    )
}

fn not_found<E: Entity>(id: Uuid) -> ApiError {
  ApiError::NotFound(format!("{} {id} not found", E::NAME))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /<path>[?col=value...][&sort=-col][&limit=n][&offset=n]`
pub async fn list<E, S>(
  State(store): State<Arc<S>>,
  params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Record<E>>>, ApiError>
where
  E: Entity,
  S: Repository<E>,
{
  let Query(params) = params?;
  let query = ListQuery::from_params::<E>(&params)?;
  let rows = store.list(&query).await.map_err(ApiError::store)?;
  Ok(Json(rows))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /<path>/:id`
pub async fn get_one<E, S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Record<E>>, ApiError>
where
  E: Entity,
  S: Repository<E>,
{
  let Path(id) = id?;
  let record = store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found::<E>(id))?;
  Ok(Json(record))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /<path>`
pub async fn create<E, S>(
  State(store): State<Arc<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Record<E>>), ApiError>
where
  E: Entity,
  S: Repository<E>,
{
  let Json(body) = body?;
  let draft = parse_draft::<E>(body)?;
  let record = store.create(draft).await.map_err(ApiError::store)?;
  tracing::debug!(entity = E::NAME, id = %record.id, "created");
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /<path>/:id` (also `PUT`)
///
/// The store checks the patched row against the entity's rules before
/// writing; a change that would leave the record invalid is a 400.
pub async fn update<E, S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Record<E>>, ApiError>
where
  E: Entity,
  S: Repository<E>,
{
  let Path(id) = id?;
  let Json(body) = body?;
  let patch = Patch::parse::<E>(body)?;

  let updated = store
    .update(id, &patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found::<E>(id))?;
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /<path>/:id`
pub async fn delete<E, S>(
  State(store): State<Arc<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  E: Entity,
  S: Repository<E>,
{
  let Path(id) = id?;
  if store.delete(id).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(not_found::<E>(id))
  }
}
