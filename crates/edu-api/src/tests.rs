//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use edu_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string())),
    None => builder.body(Body::empty()),
  }
  .unwrap();

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn create(app: &Router, path: &str, body: Value) -> Value {
  let (status, value) = send(app, "POST", path, Some(body)).await;
  assert_eq!(status, StatusCode::CREATED, "POST {path}: {value}");
  value
}

fn id_of(record: &Value) -> &str { record["id"].as_str().unwrap() }

// ─── CRUD ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn post_then_get_returns_created_record() {
  let app = app().await;
  let created = create(
    &app,
    "/students",
    json!({ "ten_hoc_sinh": "Nguyen Van An", "ngay_sinh": "2013-02-01" }),
  )
  .await;
  assert_eq!(created["ten_hoc_sinh"], "Nguyen Van An");
  assert!(created["created_at"].is_string());

  let (status, fetched) = send(&app, "GET", &format!("/students/{}", id_of(&created)), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn patch_changes_only_given_fields() {
  let app = app().await;
  let created = create(
    &app,
    "/employees",
    json!({ "ten_nhan_su": "Tran Binh", "chuc_vu": "giao_vien", "dien_thoai": "0911" }),
  )
  .await;

  let uri = format!("/employees/{}", id_of(&created));
  let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "chuc_vu": "quan_ly" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["chuc_vu"], "quan_ly");
  assert_eq!(updated["dien_thoai"], "0911");
  assert_eq!(updated["ten_nhan_su"], "Tran Binh");
  assert_eq!(updated["created_at"], created["created_at"]);
}

#[tokio::test]
async fn put_behaves_like_patch() {
  let app = app().await;
  let created = create(&app, "/contacts", json!({ "ten_lien_he": "Le C" })).await;
  let uri = format!("/contacts/{}", id_of(&created));
  let (status, updated) = send(&app, "PUT", &uri, Some(json!({ "nguon": "facebook" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["nguon"], "facebook");
  assert_eq!(updated["ten_lien_he"], "Le C");
}

#[tokio::test]
async fn delete_lifecycle() {
  let app = app().await;
  let (status, body) = send(&app, "DELETE", &format!("/students/{}", Uuid::new_v4()), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());

  let created = create(&app, "/students", json!({ "ten_hoc_sinh": "D" })).await;
  let uri = format!("/students/{}", id_of(&created));
  let (status, _) = send(&app, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_missing_row_is_404() {
  let app = app().await;
  let uri = format!("/classes/{}", Uuid::new_v4());
  let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "ghi_chu": "x" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn bad_bodies_are_400() {
  let app = app().await;

  let (status, body) = send(&app, "POST", "/students", Some(json!(["not", "an", "object"]))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, _) = send(
    &app,
    "POST",
    "/students",
    Some(json!({ "ten_hoc_sinh": "E", "lop_hoc": "nope" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &app,
    "POST",
    "/students",
    Some(json!({ "id": Uuid::new_v4(), "ten_hoc_sinh": "E" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let req = Request::builder()
    .method("POST")
    .uri("/students")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{ not json"))
    .unwrap();
  let resp = app.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn finance_requires_direction() {
  let app = app().await;
  let (status, body) = send(&app, "POST", "/finances", Some(json!({ "so_tien": 500000 }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("loai_thu_chi"), "{body}");

  create(&app, "/finances", json!({ "loai_thu_chi": "thu", "so_tien": 500000 })).await;
}

#[tokio::test]
async fn patch_that_breaks_a_rule_is_rejected_and_not_written() {
  let app = app().await;
  let created = create(
    &app,
    "/classes",
    json!({ "ten_lop_full": "Starters A", "ngay_bat_dau": "2024-09-01" }),
  )
  .await;
  let uri = format!("/classes/{}", id_of(&created));

  let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "ngay_ket_thuc": "2024-08-01" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, fetched) = send(&app, "GET", &uri, None).await;
  assert!(fetched["ngay_ket_thuc"].is_null());
}

#[tokio::test]
async fn concurrent_patches_cannot_leave_an_invalid_row() {
  let app = app().await;
  let created = create(&app, "/classes", json!({ "ten_lop_full": "Movers C" })).await;
  let uri = format!("/classes/{}", id_of(&created));

  let (a, b) = tokio::join!(
    send(&app, "PATCH", &uri, Some(json!({ "ngay_bat_dau": "2025-01-01" }))),
    send(&app, "PATCH", &uri, Some(json!({ "ngay_ket_thuc": "2024-01-01" }))),
  );
  let mut statuses = [a.0, b.0];
  statuses.sort();
  assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST], "{} / {}", a.1, b.1);

  let (_, fetched) = send(&app, "GET", &uri, None).await;
  assert!(
    fetched["ngay_bat_dau"].is_null() || fetched["ngay_ket_thuc"].is_null(),
    "{fetched}"
  );
}

#[tokio::test]
async fn missing_reference_is_409() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/enrollments",
    Some(json!({ "hoc_sinh_id": Uuid::new_v4(), "lop_id": Uuid::new_v4() })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT, "{body}");
}

#[tokio::test]
async fn malformed_ids_are_400_with_json_body() {
  let app = app().await;
  for (method, body) in [
    ("GET", None),
    ("PATCH", Some(json!({ "ghi_chu": "x" }))),
    ("PUT", Some(json!({ "ghi_chu": "x" }))),
    ("DELETE", None),
  ] {
    let (status, value) = send(&app, method, "/students/not-a-uuid", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
    assert!(value["error"].is_string(), "{method}: {value}");
  }
}

#[tokio::test]
async fn out_of_range_paging_is_400_with_json_body() {
  let app = app().await;
  create(&app, "/students", json!({ "ten_hoc_sinh": "G" })).await;

  for uri in [
    "/students?limit=18446744073709551615",
    "/students?offset=18446744073709551615",
  ] {
    let (status, value) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert!(value["error"].is_string(), "{uri}: {value}");
  }
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_and_sorts() {
  let app = app().await;
  for (value, order) in [("b", 2), ("a", 1), ("c", 3)] {
    create(
      &app,
      "/settings",
      json!({ "category": "trinh_do", "value": value, "order_num": order }),
    )
    .await;
  }
  create(&app, "/settings", json!({ "category": "nguon", "value": "zalo" })).await;

  let (status, rows) = send(&app, "GET", "/settings?category=trinh_do&sort=-order_num", None).await;
  assert_eq!(status, StatusCode::OK);
  let values: Vec<_> = rows.as_array().unwrap().iter().map(|r| r["value"].clone()).collect();
  assert_eq!(values, [json!("c"), json!("b"), json!("a")]);

  let (status, _) = send(&app, "GET", "/settings?khong_co=1", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clock_ins_accept_camel_case_filters() {
  let app = app().await;
  let emp = create(&app, "/employees", json!({ "ten_nhan_su": "F" })).await;
  let emp_id = id_of(&emp);
  for day in ["2024-10-01", "2024-10-02"] {
    create(
      &app,
      "/employee-clock-ins",
      json!({ "nhan_vien_id": emp_id, "ngay": day, "gio_vao": "07:55" }),
    )
    .await;
  }

  let uri = format!("/employee-clock-ins?employeeId={emp_id}&date=2024-10-02");
  let (status, rows) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  let rows = rows.as_array().unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0]["ngay"], "2024-10-02");
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn grouped_settings_keep_category_order() {
  let app = app().await;
  for (category, value, order) in [
    ("gioi_tinh", "nu", 2),
    ("nguon", "facebook", 1),
    ("gioi_tinh", "nam", 1),
  ] {
    create(
      &app,
      "/settings",
      json!({ "category": category, "value": value, "order_num": order }),
    )
    .await;
  }

  let (status, groups) = send(&app, "GET", "/settings/grouped", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(groups[0]["category"], "gioi_tinh");
  assert_eq!(groups[0]["values"][0]["value"], "nam");
  assert_eq!(groups[0]["values"][1]["value"], "nu");
  assert_eq!(groups[1]["category"], "nguon");

  let (_, only) = send(&app, "GET", "/settings/grouped?category=nguon", None).await;
  assert_eq!(only.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn enrollment_details_include_names() {
  let app = app().await;
  let student = create(&app, "/students", json!({ "ten_hoc_sinh": "Pham G" })).await;
  let class = create(&app, "/classes", json!({ "ten_lop_full": "Movers 2" })).await;
  create(
    &app,
    "/enrollments",
    json!({ "hoc_sinh_id": id_of(&student), "lop_id": id_of(&class) }),
  )
  .await;

  let uri = format!("/enrollments/details?class_id={}", id_of(&class));
  let (status, rows) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(rows[0]["ten_hoc_sinh"], "Pham G");
  assert_eq!(rows[0]["ten_lop_full"], "Movers 2");
  assert_eq!(rows[0]["hoc_sinh_id"], student["id"]);
}

#[tokio::test]
async fn files_by_owner_branches_on_entity_type() {
  let app = app().await;
  let class = create(&app, "/classes", json!({ "ten_lop_full": "KET 1" })).await;
  create(
    &app,
    "/files",
    json!({ "ten_file": "giao-trinh.pdf", "duong_dan": "/f/a", "lop_id": id_of(&class) }),
  )
  .await;
  create(&app, "/files", json!({ "ten_file": "khac.pdf", "duong_dan": "/f/b" })).await;

  let uri = format!("/files/by-owner?entity_type=class&entity_id={}", id_of(&class));
  let (status, files) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(files.as_array().unwrap().len(), 1);
  assert_eq!(files[0]["ten_file"], "giao-trinh.pdf");

  let uri = format!("/files/by-owner?entity_type=parent&entity_id={}", id_of(&class));
  let (status, _) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_sums_finances() {
  let app = app().await;
  create(&app, "/students", json!({ "ten_hoc_sinh": "H" })).await;
  create(&app, "/finances", json!({ "loai_thu_chi": "thu", "so_tien": 2000000 })).await;
  create(&app, "/finances", json!({ "loai_thu_chi": "chi", "so_tien": 750000 })).await;

  let (status, d) = send(&app, "GET", "/dashboard", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(d["so_hoc_sinh"], 1);
  assert_eq!(d["tong_thu"].as_f64(), Some(2_000_000.0));
  assert_eq!(d["tong_chi"].as_f64(), Some(750_000.0));
  assert_eq!(d["so_du"].as_f64(), Some(1_250_000.0));
}

#[tokio::test]
async fn health_is_ok() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/health", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "ok");
}
