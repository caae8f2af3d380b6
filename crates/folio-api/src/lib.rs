//! JSON REST API for Folio.
//!
//! Exposes an axum [`Router`] backed by any [`ContentStore`]. TLS and the
//! outer server are the caller's responsibility; Basic auth on writes is
//! applied when an [`AuthConfig`] is supplied.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", folio_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod records;

use std::sync::Arc;

use axum::{
  Json, Router,
  http::Uri,
  routing::{get, put},
};
use folio_core::{
  Listed, Singleton,
  content::{
    About, Education, Experience, Profile, Project, Skill, SocialLink, SoftSkill,
    TechFocus,
  },
  store::ContentStore,
};
use serde_json::{Value, json};

pub use auth::{AuthConfig, verify_password};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub auth:  Option<Arc<AuthConfig>>,
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store, auth: None } }

  pub fn with_auth(mut self, auth: AuthConfig) -> Self {
    self.auth = Some(Arc::new(auth));
    self
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), auth: self.auth.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ContentStore + 'static,
{
  let router = Router::new().route("/health", get(health));

  let router = singleton::<S, Profile>(router);
  let router = singleton::<S, About>(router);
  let router = listed::<S, SocialLink>(router);
  let router = listed::<S, Skill>(router);
  let router = listed::<S, SoftSkill>(router);
  let router = listed::<S, TechFocus>(router);
  let router = listed::<S, Project>(router);
  let router = listed::<S, Experience>(router);
  let router = listed::<S, Education>(router);

  router.fallback(unknown_collection).with_state(state)
}

/// Mount `GET|POST /{key}` and `PUT|DELETE /{key}/{id}` for a list collection.
fn listed<S, E>(router: Router<AppState<S>>) -> Router<AppState<S>>
where
  S: ContentStore + 'static,
  E: Listed,
{
  let base = format!("/{}", E::COLLECTION.key());
  router
    .route(&base, get(records::list::<S, E>).post(records::create::<S, E>))
    .route(
      &format!("{base}/{{id}}"),
      put(records::update::<S, E>).delete(records::remove::<S, E>),
    )
}

/// Mount `GET|PUT /{key}` and `PUT /{key}/{id}` for a singleton collection.
fn singleton<S, E>(router: Router<AppState<S>>) -> Router<AppState<S>>
where
  S: ContentStore + 'static,
  E: Singleton,
{
  let base = format!("/{}", E::COLLECTION.key());
  router
    .route(
      &base,
      get(records::get_singleton::<S, E>).put(records::upsert::<S, E>),
    )
    .route(&format!("{base}/{{id}}"), put(records::update::<S, E>))
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

async fn unknown_collection(uri: Uri) -> ApiError {
  let segment = uri.path().trim_start_matches('/').split('/').next().unwrap_or_default();
  ApiError::UnknownCollection(segment.to_owned())
}

#[cfg(test)]
mod tests;
