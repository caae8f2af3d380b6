//! Async HTTP client wrapping the Folio JSON API.

use std::time::Duration;

use folio_core::{Entity, Listed, Record, RecordId, Singleton, store::ContentStore};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Connection settings for the Folio API.
#[derive(Debug, Clone)]
pub struct HttpConfig {
  pub base_url: String,
  /// Empty means no `Authorization` header is sent.
  pub username: String,
  pub password: String,
  pub timeout:  Duration,
}

impl HttpConfig {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
      username: String::new(),
      password: String::new(),
      timeout:  Duration::from_secs(30),
    }
  }

  pub fn with_credentials(
    mut self,
    username: impl Into<String>,
    password: impl Into<String>,
  ) -> Self {
    self.username = username.into();
    self.password = password.into();
    self
  }
}

/// A [`ContentStore`] backed by a remote Folio server.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpStore {
  client: Client,
  config: HttpConfig,
}

impl HttpStore {
  pub fn new(config: HttpConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    let req = self.client.request(method, self.url(path));
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Send `req` and turn any non-success status into [`Error::Status`],
  /// carrying the server's `error` message when it sent one.
  async fn send(
    &self,
    method: &'static str,
    path: &str,
    req: RequestBuilder,
  ) -> Result<Response> {
    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
      .ok()
      .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
      .unwrap_or(text);
    Err(Error::Status { method, path: path.to_owned(), status, message })
  }

  async fn json<T: DeserializeOwned>(
    &self,
    method: &'static str,
    path: &str,
    req: RequestBuilder,
  ) -> Result<T> {
    Ok(self.send(method, path, req).await?.json().await?)
  }

  /// `GET /api/health`
  pub async fn health(&self) -> Result<()> {
    let path = "/health";
    self.send("GET", path, self.request(Method::GET, path)).await?;
    Ok(())
  }
}

fn collection_path<E: Entity>() -> String { format!("/{}", E::COLLECTION.key()) }

fn record_path<E: Entity>(id: &RecordId) -> String {
  format!("/{}/{}", E::COLLECTION.key(), id)
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for HttpStore {
  type Error = Error;

  /// `GET /api/{collection}?include_hidden=<bool>`
  async fn list<E: Listed>(&self, include_hidden: bool) -> Result<Vec<Record<E>>> {
    let path = collection_path::<E>();
    let req = self
      .request(Method::GET, &path)
      .query(&[("include_hidden", include_hidden)]);
    self.json("GET", &path, req).await
  }

  /// `GET /api/{singleton}`
  async fn get_singleton<E: Singleton>(&self) -> Result<Option<Record<E>>> {
    let path = collection_path::<E>();
    let req = self.request(Method::GET, &path);
    self.json("GET", &path, req).await
  }

  /// `POST /api/{collection}`
  async fn insert<E: Listed>(&self, payload: E) -> Result<Record<E>> {
    payload.validate()?;
    let path = collection_path::<E>();
    let req = self.request(Method::POST, &path).json(&payload);
    self.json("POST", &path, req).await
  }

  /// `PUT /api/{collection}/{id}`
  async fn update<E: Entity>(&self, id: RecordId, payload: E) -> Result<Record<E>> {
    payload.validate()?;
    let path = record_path::<E>(&id);
    let req = self.request(Method::PUT, &path).json(&payload);
    self.json("PUT", &path, req).await
  }

  /// `PUT /api/{singleton}`
  async fn upsert<E: Singleton>(&self, payload: E) -> Result<Record<E>> {
    payload.validate()?;
    let path = collection_path::<E>();
    let req = self.request(Method::PUT, &path).json(&payload);
    self.json("PUT", &path, req).await
  }

  /// `DELETE /api/{collection}/{id}`
  async fn delete<E: Entity>(&self, id: RecordId) -> Result<()> {
    let path = record_path::<E>(&id);
    let req = self.request(Method::DELETE, &path);
    self.send("DELETE", &path, req).await?;
    Ok(())
  }
}
