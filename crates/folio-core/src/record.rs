//! Stored records: a store-assigned identity wrapped around an entity payload.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque record identifier.
///
/// The relational store issues UUIDs; the local store issues
/// timestamp-derived integers. Callers never interpret the contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<String> for RecordId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for RecordId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// A persisted entity. Serialises flat: `id`, `created_at`, `updated_at`
/// followed by the payload's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<E> {
  pub id:         RecordId,
  /// Store-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
  /// Store-assigned; refreshed on every update.
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub data:       E,
}

impl<E> Record<E> {
  /// Build a record stamped with the current time.
  pub fn stamped(id: RecordId, data: E) -> Self {
    let now = Utc::now();
    Self { id, created_at: now, updated_at: now, data }
  }
}
