//! Client tests against a real server bound to an ephemeral port.

use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::get};
use chrono::NaiveDate;
use edu_core::{
  academic::{Class, Enrollment},
  admin::Setting,
  file::{File, FileOwner},
  finance::{Finance, FinanceKind},
  operations::EmployeeClockIn,
  people::{Employee, Student},
  query::Patch,
};
use edu_store_sqlite::SqliteStore;
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::{ApiClient, ApiConfig, ClientError};

fn client_for(base_url: String) -> ApiClient {
  ApiClient::new(ApiConfig {
    base_url,
    username: String::new(),
    password: String::new(),
  })
  .unwrap()
}

async fn serve(app: Router) -> ApiClient {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  client_for(format!("http://{addr}"))
}

async fn spawn_server() -> ApiClient {
  let store = SqliteStore::open_in_memory().await.unwrap();
  serve(Router::new().nest("/api", edu_api::api_router(Arc::new(store)))).await
}

// ─── CRUD ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn service_crud_round_trip() {
  let api = spawn_server().await;
  let students = api.service::<Student>();

  let mut draft = Student::named("Vo Thi Hoa");
  draft.ngay_sinh = NaiveDate::from_ymd_opt(2014, 6, 1);
  let created = students.create(&draft).await.unwrap();
  assert_eq!(created.data, draft);

  let fetched = students.get(created.id).await.unwrap();
  assert_eq!(fetched, Some(created.clone()));

  let patch = Patch::parse::<Student>(json!({ "trang_thai": "dang_hoc" })).unwrap();
  let updated = students.update(created.id, &patch).await.unwrap().unwrap();
  assert_eq!(updated.data.trang_thai.as_deref(), Some("dang_hoc"));
  assert_eq!(updated.data.ngay_sinh, draft.ngay_sinh);

  assert_eq!(students.list().await.unwrap().len(), 1);

  assert!(students.delete(created.id).await.unwrap());
  assert!(!students.delete(created.id).await.unwrap());
  assert_eq!(students.get(created.id).await.unwrap(), None);
}

#[tokio::test]
async fn update_of_missing_row_is_none() {
  let api = spawn_server().await;
  let result = api
    .service::<Class>()
    .update_json(Uuid::new_v4(), json!({ "ghi_chu": "x" }))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_where_filters_on_server() {
  let api = spawn_server().await;
  let settings = api.service::<Setting>();
  settings.create(&Setting::new("nguon", "zalo", 1)).await.unwrap();
  settings.create(&Setting::new("cap_do", "a1", 1)).await.unwrap();

  let rows = settings
    .list_where(&[("category".to_string(), "nguon".to_string())])
    .await
    .unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].data.value, "zalo");
}

// ─── Error convention ────────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_finance_fails_before_any_request() {
  // Nothing listens on the discard port; reaching the network would be an
  // `Http` error, not a validation error.
  let api = client_for("http://127.0.0.1:9".to_string());
  let mut draft = Finance::new(FinanceKind::Thu, 100_000.0);
  draft.loai_thu_chi = None;

  let err = api.service::<Finance>().create(&draft).await.unwrap_err();
  assert!(matches!(err, ClientError::Validation(_)), "{err}");

  let err = api
    .service::<Finance>()
    .create_json(json!({ "so_tien": 100000 }))
    .await
    .unwrap_err();
  assert!(matches!(err, ClientError::Validation(_)), "{err}");
}

#[tokio::test]
async fn unknown_filter_fails_before_any_request() {
  let api = client_for("http://127.0.0.1:9".to_string());
  let err = api
    .service::<Student>()
    .list_where(&[("lop".to_string(), "x".to_string())])
    .await
    .unwrap_err();
  assert!(matches!(err, ClientError::Validation(_)), "{err}");
}

#[tokio::test]
async fn server_error_on_list_is_an_error_not_empty() {
  let app = Router::new().route(
    "/api/students",
    get(|| async {
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "database is locked" })),
      )
    }),
  );
  let api = serve(app).await;

  let err = api.service::<Student>().list().await.unwrap_err();
  match err {
    ClientError::Status { status, message } => {
      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(message, "database is locked");
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn constraint_violation_surfaces_as_conflict() {
  let api = spawn_server().await;
  let err = api
    .service::<Enrollment>()
    .create(&Enrollment::new(Uuid::new_v4(), Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(
    matches!(err, ClientError::Status { status, .. } if status == StatusCode::CONFLICT),
    "{err}"
  );
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn report_endpoints() {
  let api = spawn_server().await;

  let student = api.service::<Student>().create(&Student::named("Ngo I")).await.unwrap();
  let class = api.service::<Class>().create(&Class::named("Flyers 3")).await.unwrap();
  api
    .service::<Enrollment>()
    .create(&Enrollment::new(student.id, class.id))
    .await
    .unwrap();
  api
    .service::<Finance>()
    .create(&Finance::new(FinanceKind::Thu, 1_200_000.0))
    .await
    .unwrap();

  let details = api.enrollment_details(Some(class.id)).await.unwrap();
  assert_eq!(details.len(), 1);
  assert_eq!(details[0].ten_hoc_sinh.as_deref(), Some("Ngo I"));

  let dashboard = api.dashboard().await.unwrap();
  assert_eq!(dashboard.so_ghi_danh, 1);
  assert_eq!(dashboard.so_du, 1_200_000.0);

  api
    .service::<File>()
    .create(&File::new("the-hoc-sinh.png", "/f/1").attach(FileOwner::Student, student.id))
    .await
    .unwrap();
  let files = api.files_for(FileOwner::Student, student.id).await.unwrap();
  assert_eq!(files.len(), 1);
  assert!(api.files_for(FileOwner::Class, class.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn grouped_settings_and_clock_ins() {
  let api = spawn_server().await;
  let settings = api.service::<Setting>();
  settings.create(&Setting::new("gioi_tinh", "nu", 2)).await.unwrap();
  settings.create(&Setting::new("gioi_tinh", "nam", 1)).await.unwrap();

  let groups = api.grouped_settings(Some("gioi_tinh")).await.unwrap();
  assert_eq!(groups.len(), 1);
  let values: Vec<_> = groups[0].values.iter().map(|r| r.data.value.as_str()).collect();
  assert_eq!(values, ["nam", "nu"]);

  let emp = api.service::<Employee>().create(&Employee::named("K")).await.unwrap();
  let day = NaiveDate::from_ymd_opt(2024, 11, 4).unwrap();
  api
    .service::<EmployeeClockIn>()
    .create(&EmployeeClockIn {
      nhan_vien_id: emp.id,
      ngay:         day,
      gio_vao:      Some("08:02".into()),
      gio_ra:       Some("17:10".into()),
      ghi_chu:      None,
    })
    .await
    .unwrap();

  assert_eq!(api.clock_ins(emp.id, Some(day)).await.unwrap().len(), 1);
  assert!(api.clock_ins(emp.id, day.succ_opt()).await.unwrap().is_empty());
}
