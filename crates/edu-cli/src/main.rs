//! `edu` — command-line client for the education-center API.
//!
//! # Usage
//!
//! ```text
//! edu --url http://localhost:8080 tables
//! edu list students trang_thai=dang_hoc sort=-created_at
//! edu create finances '{"loai_thu_chi":"thu","so_tien":1500000}'
//! edu update classes 6f1c… '{"tinh_trang":"ket_thuc"}'
//! edu --config ~/.config/edu/config.toml dashboard
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use edu_cli::{ApiClient, ApiConfig};
use edu_core::{
  Entity, TABLES,
  academic::{Attendance, Class, Enrollment, Evaluation, TeachingSession},
  admin::{Session, Setting},
  file::File,
  finance::{Finance, Payroll},
  operations::{Asset, EmployeeClockIn, Event, Facility, Request, Task},
  people::{Contact, Employee, Student},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "edu", about = "Command-line client for the education center API")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the server (default: http://localhost:8080).
  #[arg(long, env = "EDU_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "EDU_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "EDU_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List the entity tables and their columns.
  Tables,
  /// List rows, optionally filtered with `column=value` (also `sort=`,
  /// `limit=`, `offset=`).
  List {
    entity:  String,
    #[arg(value_parser = parse_key_val)]
    filters: Vec<(String, String)>,
  },
  /// Fetch one row by id.
  Get { entity: String, id: Uuid },
  /// Create a row from a JSON object.
  Create { entity: String, json: String },
  /// Patch a row with a JSON object of changed columns.
  Update {
    entity: String,
    id:     Uuid,
    json:   String,
  },
  /// Delete a row by id.
  Delete { entity: String, id: Uuid },
  /// Show configurable enum values grouped by category.
  Enums {
    #[arg(long)]
    category: Option<String>,
  },
  /// Show enrollments with student and class names.
  Enrollments {
    #[arg(long)]
    class_id: Option<Uuid>,
  },
  /// Show headline counts and finance totals.
  Dashboard,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
  s.split_once('=')
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .ok_or_else(|| format!("expected column=value, got {s:?}"))
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // Flags and environment override the config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;

  let output = match args.command {
    Command::Tables => {
      let tables: Vec<_> = TABLES
        .iter()
        .map(|t| {
          serde_json::json!({
            "path": t.path,
            "name": t.name,
            "columns": t.columns.iter().map(|c| c.name).collect::<Vec<_>>(),
          })
        })
        .collect();
      Value::Array(tables)
    }
    Command::List { entity, filters } => {
      dispatch(&client, &entity, Action::List(filters)).await?
    }
    Command::Get { entity, id } => dispatch(&client, &entity, Action::Get(id)).await?,
    Command::Create { entity, json } => {
      dispatch(&client, &entity, Action::Create(parse_json(&json)?)).await?
    }
    Command::Update { entity, id, json } => {
      dispatch(&client, &entity, Action::Update(id, parse_json(&json)?)).await?
    }
    Command::Delete { entity, id } => dispatch(&client, &entity, Action::Delete(id)).await?,
    Command::Enums { category } => to_json(client.grouped_settings(category.as_deref()).await?)?,
    Command::Enrollments { class_id } => to_json(client.enrollment_details(class_id).await?)?,
    Command::Dashboard => to_json(client.dashboard().await?)?,
  };

  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}

fn parse_json(raw: &str) -> Result<Value> {
  serde_json::from_str(raw).context("argument is not valid JSON")
}

fn to_json(value: impl Serialize) -> Result<Value> { Ok(serde_json::to_value(value)?) }

// ─── Entity dispatch ──────────────────────────────────────────────────────────

enum Action {
  List(Vec<(String, String)>),
  Get(Uuid),
  Create(Value),
  Update(Uuid, Value),
  Delete(Uuid),
}

/// Resolve a URL path segment such as `employee-clock-ins` to its entity type
/// and run `action` against it.
async fn dispatch(client: &ApiClient, path: &str, action: Action) -> Result<Value> {
  match path {
    p if p == Student::PATH => run::<Student>(client, action).await,
    p if p == Employee::PATH => run::<Employee>(client, action).await,
    p if p == Contact::PATH => run::<Contact>(client, action).await,
    p if p == Facility::PATH => run::<Facility>(client, action).await,
    p if p == Class::PATH => run::<Class>(client, action).await,
    p if p == Enrollment::PATH => run::<Enrollment>(client, action).await,
    p if p == TeachingSession::PATH => run::<TeachingSession>(client, action).await,
    p if p == Attendance::PATH => run::<Attendance>(client, action).await,
    p if p == Evaluation::PATH => run::<Evaluation>(client, action).await,
    p if p == Finance::PATH => run::<Finance>(client, action).await,
    p if p == Payroll::PATH => run::<Payroll>(client, action).await,
    p if p == Asset::PATH => run::<Asset>(client, action).await,
    p if p == Task::PATH => run::<Task>(client, action).await,
    p if p == Event::PATH => run::<Event>(client, action).await,
    p if p == Request::PATH => run::<Request>(client, action).await,
    p if p == EmployeeClockIn::PATH => run::<EmployeeClockIn>(client, action).await,
    p if p == File::PATH => run::<File>(client, action).await,
    p if p == Setting::PATH => run::<Setting>(client, action).await,
    p if p == Session::PATH => run::<Session>(client, action).await,
    other => bail!("unknown entity {other:?}; run `edu tables` for the list"),
  }
}

async fn run<E: Entity>(client: &ApiClient, action: Action) -> Result<Value> {
  let service = client.service::<E>();
  match action {
    Action::List(filters) => to_json(service.list_where(&filters).await?),
    Action::Get(id) => match service.get(id).await? {
      Some(record) => to_json(record),
      None => bail!("{} {id} not found", E::NAME),
    },
    Action::Create(body) => to_json(service.create_json(body).await?),
    Action::Update(id, body) => match service.update_json(id, body).await? {
      Some(record) => to_json(record),
      None => bail!("{} {id} not found", E::NAME),
    },
    Action::Delete(id) => {
      if !service.delete(id).await? {
        bail!("{} {id} not found", E::NAME);
      }
      Ok(serde_json::json!({ "deleted": id }))
    }
  }
}
