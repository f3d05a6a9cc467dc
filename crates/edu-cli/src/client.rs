//! Async HTTP client wrapping the education-center JSON API.
//!
//! Every call returns [`Result`]: a non-success response is always an error
//! carrying the server's message, never an empty value.

use std::{marker::PhantomData, time::Duration};

use chrono::NaiveDate;
use edu_core::{
  Entity, Record,
  enums::EnumCategory,
  file::{File, FileOwner},
  operations::EmployeeClockIn,
  query::{ListQuery, Patch},
  record::parse_draft,
  view::{Dashboard, EnrollmentDetail},
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ClientError, Result};

/// Connection settings for the API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// The typed CRUD service for `E`.
  pub fn service<E: Entity>(&self) -> Service<'_, E> {
    Service { api: self, _entity: PhantomData }
  }

  async fn send(&self, req: RequestBuilder) -> Result<Response> {
    let resp = self.auth(req).send().await?;
    check(resp).await
  }

  async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
    Ok(self.send(req).await?.json().await?)
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  /// `GET /api/dashboard`
  pub async fn dashboard(&self) -> Result<Dashboard> {
    self.fetch(self.client.get(self.url("/dashboard"))).await
  }

  /// `GET /api/enrollments/details[?class_id=<id>]`
  pub async fn enrollment_details(&self, class_id: Option<Uuid>) -> Result<Vec<EnrollmentDetail>> {
    let mut req = self.client.get(self.url("/enrollments/details"));
    if let Some(id) = class_id {
      req = req.query(&[("class_id", id.to_string())]);
    }
    self.fetch(req).await
  }

  /// `GET /api/settings/grouped[?category=<name>]`
  pub async fn grouped_settings(&self, category: Option<&str>) -> Result<Vec<EnumCategory>> {
    let mut req = self.client.get(self.url("/settings/grouped"));
    if let Some(category) = category {
      req = req.query(&[("category", category)]);
    }
    self.fetch(req).await
  }

  /// `GET /api/employee-clock-ins?employeeId=<id>[&date=<YYYY-MM-DD>]`
  pub async fn clock_ins(
    &self,
    employee_id: Uuid,
    date: Option<NaiveDate>,
  ) -> Result<Vec<Record<EmployeeClockIn>>> {
    let mut params = vec![("employeeId".to_string(), employee_id.to_string())];
    if let Some(date) = date {
      params.push(("date".to_string(), date.to_string()));
    }
    self.service::<EmployeeClockIn>().list_where(&params).await
  }

  /// `GET /api/files/by-owner?entity_type=<type>&entity_id=<id>`
  pub async fn files_for(&self, owner: FileOwner, id: Uuid) -> Result<Vec<Record<File>>> {
    let req = self.client.get(self.url("/files/by-owner")).query(&[
      ("entity_type", owner.to_string()),
      ("entity_id", id.to_string()),
    ]);
    self.fetch(req).await
  }
}

/// Turn a non-success response into [`ClientError::Status`], preferring the
/// `{"error": "..."}` message from the body.
async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  let message = serde_json::from_str::<Value>(&body)
    .ok()
    .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
    .unwrap_or(body);
  tracing::debug!(%status, %message, "request rejected");
  Err(ClientError::Status { status, message })
}

fn is_not_found(e: &ClientError) -> bool {
  matches!(e, ClientError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
}

// ─── Service ──────────────────────────────────────────────────────────────────

/// CRUD calls for one entity table, at `/api/<E::PATH>`.
pub struct Service<'a, E> {
  api:     &'a ApiClient,
  _entity: PhantomData<E>,
}

impl<E: Entity> Service<'_, E> {
  fn collection(&self) -> String { self.api.url(&format!("/{}", E::PATH)) }

  fn item(&self, id: Uuid) -> String { self.api.url(&format!("/{}/{id}", E::PATH)) }

  /// Every row, oldest first.
  pub async fn list(&self) -> Result<Vec<Record<E>>> { self.list_where(&[]).await }

  /// Rows matching query parameters (`col=value`, `sort`, `limit`,
  /// `offset`). Unknown columns are rejected before sending.
  pub async fn list_where(&self, params: &[(String, String)]) -> Result<Vec<Record<E>>> {
    ListQuery::from_params::<E>(params)?;
    let req = self.api.client.get(self.collection()).query(params);
    self.api.fetch(req).await
  }

  /// `None` when no row has this id.
  pub async fn get(&self, id: Uuid) -> Result<Option<Record<E>>> {
    match self.api.fetch(self.api.client.get(self.item(id))).await {
      Ok(record) => Ok(Some(record)),
      Err(e) if is_not_found(&e) => Ok(None),
      Err(e) => Err(e),
    }
  }

  /// Validate `data` locally, then create it.
  pub async fn create(&self, data: &E) -> Result<Record<E>> {
    data.validate()?;
    let req = self.api.client.post(self.collection()).json(data);
    self.api.fetch(req).await
  }

  /// Create from a raw JSON object, checked the same way the server would.
  pub async fn create_json(&self, body: Value) -> Result<Record<E>> {
    let draft = parse_draft::<E>(body)?;
    self.create(&draft).await
  }

  /// Apply `patch`; `None` when no row has this id.
  pub async fn update(&self, id: Uuid, patch: &Patch) -> Result<Option<Record<E>>> {
    let req = self.api.client.patch(self.item(id)).json(patch);
    match self.api.fetch(req).await {
      Ok(record) => Ok(Some(record)),
      Err(e) if is_not_found(&e) => Ok(None),
      Err(e) => Err(e),
    }
  }

  /// Patch from a raw JSON object.
  pub async fn update_json(&self, id: Uuid, body: Value) -> Result<Option<Record<E>>> {
    let patch = Patch::parse::<E>(body)?;
    self.update(id, &patch).await
  }

  /// `false` when no row had this id.
  pub async fn delete(&self, id: Uuid) -> Result<bool> {
    match self.api.send(self.api.client.delete(self.item(id))).await {
      Ok(_) => Ok(true),
      Err(e) if is_not_found(&e) => Ok(false),
      Err(e) => Err(e),
    }
  }
}
