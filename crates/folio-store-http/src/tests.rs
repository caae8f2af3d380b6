//! End-to-end tests against an in-process API server on a loopback port.

use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use folio_api::{AppState, AuthConfig, api_router};
use folio_core::{
  Classify, FailureKind, Listed, RecordId,
  content::{Profile, Project, Skill},
  store::ContentStore,
};
use folio_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;

use crate::{HttpConfig, HttpStore};

/// Serve a fresh in-memory store and return its base URL.
async fn serve(auth: Option<AuthConfig>) -> String {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let mut state = AppState::new(Arc::new(store));
  if let Some(auth) = auth {
    state = state.with_auth(auth);
  }
  let app = axum::Router::new().nest("/api", api_router(state));

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  format!("http://{addr}")
}

async fn client() -> HttpStore {
  HttpStore::new(HttpConfig::new(serve(None).await)).unwrap()
}

fn project(name: &str, order: u32) -> Project {
  Project {
    name: name.into(),
    description: "d".into(),
    github_url: "https://github.com/x/x".into(),
    display_order: order,
    ..Project::default()
  }
}

#[tokio::test]
async fn health_check_succeeds() {
  client().await.health().await.unwrap();
}

#[tokio::test]
async fn health_check_fails_when_nothing_listens() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let store = HttpStore::new(HttpConfig::new(format!("http://{addr}"))).unwrap();
  let err = store.health().await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::Unavailable);
}

#[tokio::test]
async fn project_scenario_over_http() {
  let s = client().await;
  let created = s
    .insert(Project { technologies: vec!["Go".into()], ..project("X", 0) })
    .await
    .unwrap();

  let listed = s.list_all::<Project>().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, created.id);
  assert_eq!(listed[0].data.technologies, vec!["Go"]);

  s.delete::<Project>(created.id.clone()).await.unwrap();
  assert!(s.list_all::<Project>().await.unwrap().is_empty());
}

#[tokio::test]
async fn status_codes_map_to_failure_kinds() {
  let s = client().await;

  let err = s
    .update(RecordId::from("missing"), project("x", 0))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), FailureKind::NotFound);

  let err = s.delete::<Skill>(RecordId::from("missing")).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::NotFound);

  let err = s.insert(project("", 0)).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::Validation);
}

#[tokio::test]
async fn hidden_listing_and_singletons_round_trip() {
  let s = client().await;
  let mut hidden = project("hidden", 0);
  hidden.set_active(false);
  s.insert(hidden).await.unwrap();

  assert!(s.list_all::<Project>().await.unwrap().is_empty());
  assert_eq!(s.list::<Project>(true).await.unwrap().len(), 1);

  assert!(s.get_singleton::<Profile>().await.unwrap().is_none());
  let saved = s
    .upsert(Profile { name: "Ana".into(), role: "Dev".into(), ..Profile::default() })
    .await
    .unwrap();
  let fetched = s.get_singleton::<Profile>().await.unwrap().unwrap();
  assert_eq!(fetched.id, saved.id);
}

#[tokio::test]
async fn credentials_are_sent_when_configured() {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(b"secret", &salt)
    .unwrap()
    .to_string();
  let base = serve(Some(AuthConfig { username: "admin".into(), password_hash: hash })).await;

  let anonymous = HttpStore::new(HttpConfig::new(base.clone())).unwrap();
  let err = anonymous.insert(project("X", 0)).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::Unavailable);

  let admin =
    HttpStore::new(HttpConfig::new(base).with_credentials("admin", "secret")).unwrap();
  admin.insert(project("X", 0)).await.unwrap();
  assert_eq!(admin.list::<Project>(true).await.unwrap().len(), 1);
}
