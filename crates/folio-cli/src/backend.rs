//! Backend selection: the remote server, or the offline store on disk.

use std::path::Path;

use anyhow::{Context, Result};
use folio_core::{
  Classify, Entity, FailureKind, Listed, Record, RecordId, Singleton, store::ContentStore,
};
use folio_store_http::{HttpConfig, HttpStore};
use folio_store_local::LocalStore;

use crate::settings::Settings;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
  #[error(transparent)]
  Remote(#[from] folio_store_http::Error),
  #[error(transparent)]
  Local(#[from] folio_store_local::Error),
}

impl Classify for BackendError {
  fn kind(&self) -> FailureKind {
    match self {
      Self::Remote(e) => e.kind(),
      Self::Local(e) => e.kind(),
    }
  }
}

/// The store the panel edits, chosen once at startup.
pub enum Backend {
  Remote(HttpStore),
  Local(LocalStore),
}

impl Backend {
  /// Pick a backend from `settings`.
  ///
  /// An explicit local directory wins. Otherwise the server is health-checked; if it
  /// does not answer and a fallback directory is configured, the offline
  /// store there is used instead.
  pub async fn connect(settings: &Settings) -> Result<Self> {
    if let Some(dir) = &settings.local_dir {
      return Self::local(dir).await;
    }

    let config = HttpConfig::new(&settings.url)
      .with_credentials(&settings.username, &settings.password);
    let remote = HttpStore::new(config).context("building HTTP client")?;

    match remote.health().await {
      Ok(()) => {
        tracing::info!(url = %settings.url, "connected to server");
        Ok(Self::Remote(remote))
      }
      Err(e) => match &settings.fallback_dir {
        Some(dir) => {
          tracing::warn!(url = %settings.url, error = %e, "server unreachable; using offline store");
          Self::local(dir).await
        }
        None => Err(e).with_context(|| format!("cannot reach {}", settings.url)),
      },
    }
  }

  async fn local(dir: &Path) -> Result<Self> {
    let store = LocalStore::open(dir)
      .await
      .with_context(|| format!("opening offline store in {}", dir.display()))?;
    tracing::info!(dir = %dir.display(), "using offline store");
    Ok(Self::Local(store))
  }

  /// Shown in the header.
  pub fn describe(&self) -> String {
    match self {
      Self::Remote(s) => s.base_url().to_string(),
      Self::Local(s) => format!("offline: {}", s.dir().display()),
    }
  }

  pub fn is_offline(&self) -> bool { matches!(self, Self::Local(_)) }
}

impl ContentStore for Backend {
  type Error = BackendError;

  async fn list<E: Listed>(&self, include_hidden: bool) -> Result<Vec<Record<E>>, BackendError> {
    Ok(match self {
      Self::Remote(s) => s.list(include_hidden).await?,
      Self::Local(s) => s.list(include_hidden).await?,
    })
  }

  async fn get_singleton<E: Singleton>(&self) -> Result<Option<Record<E>>, BackendError> {
    Ok(match self {
      Self::Remote(s) => s.get_singleton().await?,
      Self::Local(s) => s.get_singleton().await?,
    })
  }

  async fn insert<E: Listed>(&self, payload: E) -> Result<Record<E>, BackendError> {
    Ok(match self {
      Self::Remote(s) => s.insert(payload).await?,
      Self::Local(s) => s.insert(payload).await?,
    })
  }

  async fn update<E: Entity>(&self, id: RecordId, payload: E) -> Result<Record<E>, BackendError> {
    Ok(match self {
      Self::Remote(s) => s.update(id, payload).await?,
      Self::Local(s) => s.update(id, payload).await?,
    })
  }

  async fn upsert<E: Singleton>(&self, payload: E) -> Result<Record<E>, BackendError> {
    Ok(match self {
      Self::Remote(s) => s.upsert(payload).await?,
      Self::Local(s) => s.upsert(payload).await?,
    })
  }

  async fn delete<E: Entity>(&self, id: RecordId) -> Result<(), BackendError> {
    match self {
      Self::Remote(s) => s.delete::<E>(id).await?,
      Self::Local(s) => s.delete::<E>(id).await?,
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use folio_api::{AppState, api_router};
  use folio_core::content::Project;
  use folio_store_sqlite::SqliteStore;
  use tokio::net::TcpListener;

  use super::*;

  fn settings(url: String) -> Settings {
    Settings {
      url,
      username: String::new(),
      password: String::new(),
      local_dir: None,
      fallback_dir: None,
      log_file: None,
    }
  }

  async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
  }

  #[tokio::test]
  async fn healthy_server_is_used() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = axum::Router::new().nest("/api", api_router(AppState::new(Arc::new(store))));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });

    let backend = Backend::connect(&settings(format!("http://{addr}"))).await.unwrap();
    assert!(!backend.is_offline());
    assert!(backend.list_all::<Project>().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn unreachable_server_without_fallback_is_an_error() {
    assert!(Backend::connect(&settings(dead_url().await)).await.is_err());
  }

  #[tokio::test]
  async fn unreachable_server_falls_back_to_offline_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(dead_url().await);
    settings.fallback_dir = Some(dir.path().to_path_buf());

    let backend = Backend::connect(&settings).await.unwrap();
    assert!(backend.is_offline());

    let created = backend
      .insert(Project {
        name: "X".into(),
        description: "d".into(),
        github_url: "https://github.com/x/x".into(),
        ..Project::default()
      })
      .await
      .unwrap();
    let listed = backend.list_all::<Project>().await.unwrap();
    assert_eq!(listed[0].id, created.id);
  }

  #[tokio::test]
  async fn explicit_local_dir_skips_the_server() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(dead_url().await);
    settings.local_dir = Some(dir.path().to_path_buf());

    let backend = Backend::connect(&settings).await.unwrap();
    assert!(backend.describe().starts_with("offline: "));

    let missing = backend.delete::<Project>(RecordId::from("1")).await.unwrap_err();
    assert_eq!(missing.kind(), FailureKind::NotFound);
  }
}
