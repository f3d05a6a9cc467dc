//! HTTP server for the education-center backend.
//!
//! Mounts the JSON API from `edu-api` under `/api`, with request tracing and
//! optional HTTP Basic auth in front of it.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use edu_core::store::SchoolStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `EDU_*`
/// environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_database_path")]
  pub database_path:      PathBuf,
  /// Empty disables authentication.
  #[serde(default)]
  pub auth_username:      String,
  #[serde(default)]
  pub auth_password_hash: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_database_path() -> PathBuf { PathBuf::from("edu.db") }

impl ServerConfig {
  /// The credentials to enforce, if any.
  pub fn auth(&self) -> Option<AuthConfig> {
    if self.auth_username.is_empty() {
      return None;
    }
    Some(AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: the API nested under `/api`, guarded by
/// `auth` when given.
pub fn router<S>(store: Arc<S>, auth: Option<AuthConfig>) -> Router
where
  S: SchoolStore + 'static,
{
  let api = edu_api::api_router(store);
  let api = match auth {
    Some(auth) => api.layer(middleware::from_fn_with_state(Arc::new(auth), require_auth)),
    None => api,
  };

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use edu_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use tower::ServiceExt as _;

  async fn make_router(password: Option<&str>) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let auth = password.map(|password| {
      let salt = SaltString::generate(&mut OsRng);
      let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string();
      AuthConfig {
        username:      "admin".to_string(),
        password_hash: hash,
      }
    });
    router(Arc::new(store), auth)
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn get(app: Router, uri: &str, auth: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
  }

  // ── Routing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn api_is_nested_under_prefix() {
    let app = make_router(None).await;
    let resp = get(app.clone(), "/api/students", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get(app, "/students", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Auth ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_credentials_get_401_with_challenge() {
    let app = make_router(Some("secret")).await;
    let resp = get(app, "/api/students", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let challenge = resp.headers().get(header::WWW_AUTHENTICATE).unwrap();
    assert!(challenge.to_str().unwrap().starts_with("Basic"));
  }

  #[tokio::test]
  async fn correct_credentials_pass_through() {
    let app = make_router(Some("secret")).await;
    let auth = auth_header("admin", "secret");
    let resp = get(app, "/api/dashboard", Some(&auth)).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn wrong_password_is_rejected() {
    let app = make_router(Some("secret")).await;
    let auth = auth_header("admin", "nope");
    let resp = get(app, "/api/dashboard", Some(&auth)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn health_skips_auth() {
    let app = make_router(Some("secret")).await;
    let resp = get(app, "/api/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn config_defaults_and_disabled_auth() {
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str("port = 9000", config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.database_path, PathBuf::from("edu.db"));
    assert!(cfg.auth().is_none());
  }

  #[test]
  fn config_with_username_enables_auth() {
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(
        "auth_username = \"admin\"\nauth_password_hash = \"$argon2id$x\"",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    let auth = cfg.auth().unwrap();
    assert_eq!(auth.username, "admin");
    assert_eq!(auth.password_hash, "$argon2id$x");
  }
}
