//! HTTP Basic-auth for write requests.
//!
//! Authentication is optional: a server started without credentials accepts
//! every request.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use folio_core::store::ContentStore;

use crate::{AppState, error::ApiError};

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Marker extractor: present in a handler means the request may write.
pub struct Authenticated;

/// Username and password from a `Basic` authorization header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let decoded = B64.decode(value.strip_prefix("Basic ")?).ok()?;
  let text = String::from_utf8(decoded).ok()?;
  let (user, password) = text.split_once(':')?;
  Some((user.to_owned(), password.to_owned()))
}

/// Whether `password` matches the argon2 PHC string `hash`. A malformed hash
/// matches nothing.
pub fn verify_password(hash: &str, password: &str) -> bool {
  PasswordHash::new(hash)
    .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    .unwrap_or(false)
}

/// Check the `Authorization` header against `config`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), ApiError> {
  match basic_credentials(headers) {
    Some((user, password))
      if user == config.username && verify_password(&config.password_hash, &password) =>
    {
      Ok(())
    }
    _ => Err(ApiError::Unauthorized),
  }
}

impl<S: ContentStore> AppState<S> {
  /// Pass when no credentials are configured or the headers carry them.
  pub fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
    match &self.auth {
      Some(config) => verify_auth(headers, config),
      None => Ok(()),
    }
  }
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: ContentStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    state.authorize(&parts.headers)?;
    Ok(Authenticated)
  }
}
