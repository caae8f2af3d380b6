//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"error": <message>, "kind": <kind>}`.

use std::fmt::Display;

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use folio_core::{Classify, FailureKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A store call failed; status follows the failure class.
  #[error("{message}")]
  Store { kind: FailureKind, message: String },

  /// Body was not JSON at all.
  #[error("bad request: {0}")]
  BadRequest(String),

  /// Body was JSON but did not match the collection's payload shape.
  #[error("invalid payload: {0}")]
  InvalidPayload(String),

  #[error("unknown collection: {0}")]
  UnknownCollection(String),

  #[error("unauthorized")]
  Unauthorized,
}

impl ApiError {
  pub fn store<E: Classify + Display>(e: E) -> Self {
    let kind = e.kind();
    if kind == FailureKind::Unavailable {
      tracing::warn!(error = %e, "store unavailable");
    }
    Self::Store { kind, message: e.to_string() }
  }

  fn kind_name(&self) -> &'static str {
    match self {
      Self::Store { kind, .. } => kind.as_str(),
      Self::BadRequest(_) | Self::InvalidPayload(_) => FailureKind::Validation.as_str(),
      Self::UnknownCollection(_) => FailureKind::NotFound.as_str(),
      Self::Unauthorized => "unauthorized",
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::Store { kind: FailureKind::Validation, .. } | Self::InvalidPayload(_) => {
        StatusCode::UNPROCESSABLE_ENTITY
      }
      Self::Store { kind: FailureKind::NotFound, .. } | Self::UnknownCollection(_) => {
        StatusCode::NOT_FOUND
      }
      Self::Store { kind: FailureKind::Unavailable, .. } => StatusCode::SERVICE_UNAVAILABLE,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    match rejection {
      JsonRejection::JsonDataError(e) => Self::InvalidPayload(e.body_text()),
      other => Self::BadRequest(other.body_text()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = Json(json!({ "error": self.to_string(), "kind": self.kind_name() }));
    let mut res = (status, body).into_response();
    if matches!(self, Self::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"folio\""),
      );
    }
    res
  }
}
