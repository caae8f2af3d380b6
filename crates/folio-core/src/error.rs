//! Error types for `folio-core`.
//!
//! Every failure a store can report falls into one of three classes (see
//! [`FailureKind`]). Backends keep their own error enums and implement
//! [`Classify`] so callers can react without knowing the backend.

use std::fmt;

use thiserror::Error;

use crate::{collection::Collection, record::RecordId};

// ─── Validation ──────────────────────────────────────────────────────────────

/// What is wrong with a single field of a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
  /// Required value is absent, empty or whitespace-only.
  Missing,
  /// Integer outside its allowed inclusive range.
  OutOfRange { min: i64, max: i64, actual: i64 },
  /// Icon identifier outside the known set.
  UnknownIcon(String),
  /// Anything else, e.g. text where a number was expected.
  Malformed(String),
}

impl fmt::Display for Problem {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Missing => f.write_str("is required"),
      Self::OutOfRange { min, max, actual } => {
        write!(f, "must be between {min} and {max} (got {actual})")
      }
      Self::UnknownIcon(name) => write!(f, "unknown icon {name:?}"),
      Self::Malformed(msg) => f.write_str(msg),
    }
  }
}

/// A payload failed local validation. Never reaches a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {problem}")]
pub struct ValidationError {
  pub field:   String,
  pub problem: Problem,
}

impl ValidationError {
  pub fn new(field: impl Into<String>, problem: Problem) -> Self {
    Self { field: field.into(), problem }
  }

  pub fn missing(field: impl Into<String>) -> Self {
    Self::new(field, Problem::Missing)
  }
}

// ─── Classification ──────────────────────────────────────────────────────────

/// The three failure classes the admin panel distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
  /// Missing or malformed field.
  Validation,
  /// The mutation target does not exist.
  NotFound,
  /// Transient backend or network failure.
  Unavailable,
}

impl FailureKind {
  /// Stable snake_case name, used on the wire by the JSON API.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Validation => "validation",
      Self::NotFound => "not_found",
      Self::Unavailable => "unavailable",
    }
  }
}

/// Implemented by every store error type.
pub trait Classify {
  fn kind(&self) -> FailureKind;
}

impl Classify for std::convert::Infallible {
  fn kind(&self) -> FailureKind { match *self {} }
}

// ─── Core error ──────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  #[error("{collection} record not found: {id}")]
  NotFound { collection: Collection, id: RecordId },

  #[error("{0} is not a singleton collection")]
  NotSingleton(Collection),

  #[error("unknown collection: {0:?}")]
  UnknownCollection(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Classify for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Self::Validation(_) | Self::NotSingleton(_) | Self::UnknownCollection(_) => {
        FailureKind::Validation
      }
      Self::NotFound { .. } => FailureKind::NotFound,
      Self::Serialization(_) => FailureKind::Unavailable,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
