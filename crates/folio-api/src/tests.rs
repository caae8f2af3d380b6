//! Router tests driven with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use folio_store_sqlite::SqliteStore;
use rand_core::OsRng;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, AuthConfig, api_router};

async fn open_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(Arc::new(store))
}

async fn secured_state(password: &str) -> AppState<SqliteStore> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .unwrap()
    .to_string();
  open_state()
    .await
    .with_auth(AuthConfig { username: "admin".into(), password_hash: hash })
}

fn auth_header(user: &str, pass: &str) -> String {
  format!("Basic {}", B64.encode(format!("{user}:{pass}")))
}

async fn send(
  state: &AppState<SqliteStore>,
  method: &str,
  uri: &str,
  auth: Option<&str>,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(auth) = auth {
    builder = builder.header(header::AUTHORIZATION, auth);
  }
  let body = match body {
    Some(value) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(value.to_string())
    }
    None => Body::empty(),
  };
  api_router(state.clone())
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn project(name: &str, order: u32) -> Value {
  json!({
    "name": name,
    "description": "d",
    "github_url": "https://github.com/x/x",
    "technologies": ["Go"],
    "display_order": order,
  })
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_ok() {
  let state = open_state().await;
  let resp = send(&state, "GET", "/health", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await, json!({ "status": "ok" }));
}

// ── Lists ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_list_returns_flat_records_in_order() {
  let state = open_state().await;
  let resp = send(&state, "POST", "/projects", None, Some(project("B", 2))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_body(resp).await;
  assert!(created["id"].is_string());
  assert_eq!(created["name"], "B");

  send(&state, "POST", "/projects", None, Some(project("A", 1))).await;

  let resp = send(&state, "GET", "/projects", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let listed = json_body(resp).await;
  let names: Vec<_> = listed
    .as_array()
    .unwrap()
    .iter()
    .map(|r| r["name"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn update_and_delete_by_id() {
  let state = open_state().await;
  let created = json_body(
    send(&state, "POST", "/projects", None, Some(project("X", 0))).await,
  )
  .await;
  let id = created["id"].as_str().unwrap();

  let resp = send(
    &state,
    "PUT",
    &format!("/projects/{id}"),
    None,
    Some(project("Y", 0)),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["name"], "Y");

  let resp = send(&state, "DELETE", &format!("/projects/{id}"), None, None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let resp = send(&state, "DELETE", &format!("/projects/{id}"), None, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json_body(resp).await["kind"], "not_found");
}

#[tokio::test]
async fn hidden_records_need_the_query_flag() {
  let state = open_state().await;
  let mut hidden = project("H", 0);
  hidden["is_active"] = json!(false);
  send(&state, "POST", "/projects", None, Some(hidden)).await;

  let shown = json_body(send(&state, "GET", "/projects", None, None).await).await;
  assert_eq!(shown.as_array().unwrap().len(), 0);

  let all = json_body(
    send(&state, "GET", "/projects?include_hidden=true", None, None).await,
  )
  .await;
  assert_eq!(all.as_array().unwrap().len(), 1);
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn blank_required_field_is_422_validation() {
  let state = open_state().await;
  let resp = send(&state, "POST", "/projects", None, Some(project("  ", 0))).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body = json_body(resp).await;
  assert_eq!(body["kind"], "validation");
  assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn missing_field_is_422_and_garbage_is_400() {
  let state = open_state().await;
  let resp = send(&state, "POST", "/skills", None, Some(json!({ "name": "Rust" }))).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

  let req = Request::builder()
    .method("POST")
    .uri("/skills")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = api_router(state.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["kind"], "validation");
}

#[tokio::test]
async fn update_unknown_id_is_404() {
  let state = open_state().await;
  let resp = send(&state, "PUT", "/projects/nope", None, Some(project("X", 0))).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_collection_is_404_json() {
  let state = open_state().await;
  let resp = send(&state, "GET", "/recipes", None, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body = json_body(resp).await;
  assert_eq!(body["kind"], "not_found");
  assert!(body["error"].as_str().unwrap().contains("recipes"));
}

// ── Singletons ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn singleton_get_put_get() {
  let state = open_state().await;
  let resp = send(&state, "GET", "/hero_content", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await, Value::Null);

  let hero = json!({ "name": "Ana", "role": "Backend dev", "profile_image_url": null });
  let first = json_body(send(&state, "PUT", "/hero_content", None, Some(hero)).await).await;

  let hero = json!({ "name": "Ana", "role": "Lead", "profile_image_url": null });
  let second = json_body(send(&state, "PUT", "/hero_content", None, Some(hero)).await).await;
  assert_eq!(first["id"], second["id"]);

  let stored = json_body(send(&state, "GET", "/hero_content", None, None).await).await;
  assert_eq!(stored["role"], "Lead");
}

#[tokio::test]
async fn singletons_have_no_post_route() {
  let state = open_state().await;
  let hero = json!({ "name": "Ana", "role": "Dev" });
  let resp = send(&state, "POST", "/hero_content", None, Some(hero)).await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ── Auth ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn writes_require_credentials_when_configured() {
  let state = secured_state("secret").await;

  let resp = send(&state, "POST", "/projects", None, Some(project("X", 0))).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

  let bad = auth_header("admin", "wrong");
  let resp = send(&state, "POST", "/projects", Some(&bad), Some(project("X", 0))).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let good = auth_header("admin", "secret");
  let resp = send(&state, "POST", "/projects", Some(&good), Some(project("X", 0))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn public_reads_stay_open_but_hidden_reads_do_not() {
  let state = secured_state("secret").await;

  let resp = send(&state, "GET", "/projects", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = send(&state, "GET", "/projects?include_hidden=true", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let good = auth_header("admin", "secret");
  let resp = send(
    &state,
    "GET",
    "/projects?include_hidden=true",
    Some(&good),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
}
