//! Error type for `folio-store-sqlite`.

use folio_core::{Classify, Collection, FailureKind, RecordId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] folio_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to update or delete a record that is not in the collection.
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
      Self::Database(_) | Self::Json(_) | Self::DateParse(_) => {
        FailureKind::Unavailable
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
