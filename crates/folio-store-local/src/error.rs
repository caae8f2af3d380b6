//! Error type for `folio-store-local`.

use std::path::PathBuf;

use folio_core::{Classify, Collection, FailureKind, RecordId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] folio_core::Error),

  #[error("i/o error on {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("corrupt collection file {path}: {source}")]
  Corrupt {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("{collection} record not found: {id}")]
  NotFound { collection: Collection, id: RecordId },
}

impl From<folio_core::ValidationError> for Error {
  fn from(e: folio_core::ValidationError) -> Self { Self::Core(e.into()) }
}

impl Classify for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::NotFound { .. } => FailureKind::NotFound,
      Self::Io { .. } | Self::Corrupt { .. } | Self::Json(_) => {
        FailureKind::Unavailable
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
