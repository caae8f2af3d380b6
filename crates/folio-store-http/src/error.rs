//! Error type for `folio-store-http`.

use folio_core::{Classify, FailureKind};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] folio_core::Error),

  /// The request never produced a response, or the body could not be read.
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// The server answered with a non-success status.
  #[error("{method} {path} → {status}: {message}")]
  Status {
    method:  &'static str,
    path:    String,
    status:  StatusCode,
    message: String,
  },
}

impl From<folio_core::ValidationError> for Error {
  fn from(e: folio_core::ValidationError) -> Self { Self::Core(e.into()) }
}

impl Classify for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::Transport(_) => FailureKind::Unavailable,
      Self::Status { status, .. } => match *status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
          FailureKind::Validation
        }
        StatusCode::NOT_FOUND => FailureKind::NotFound,
        _ => FailureKind::Unavailable,
      },
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
