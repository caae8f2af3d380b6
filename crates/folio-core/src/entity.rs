//! The [`Entity`] trait and its two flavours, [`Listed`] and [`Singleton`].
//!
//! Stores and the admin controller are written once, generically over these
//! traits, instead of once per collection.

use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};

use crate::{collection::Collection, error::ValidationError};

/// A payload type bound to exactly one [`Collection`].
pub trait Entity:
  Serialize + DeserializeOwned + Clone + Debug + Default + PartialEq + Send + Sync + 'static
{
  const COLLECTION: Collection;

  /// Names of the ordered multi-value string fields, in form order.
  const LIST_FIELDS: &'static [&'static str] = &[];

  /// Check required fields and ranges. Called by the admin controller before
  /// any write and by stores on insert.
  fn validate(&self) -> Result<(), ValidationError>;

  /// Short human-readable label used in lists and notices.
  fn label(&self) -> &str;
}

/// A many-row collection presented by display order, with soft-delete.
pub trait Listed: Entity {
  fn display_order(&self) -> u32;

  fn is_active(&self) -> bool;

  fn set_active(&mut self, active: bool);
}

/// A collection holding at most one live record.
pub trait Singleton: Entity {}

// ─── Validation helpers ──────────────────────────────────────────────────────

/// Fail with [`Problem::Missing`](crate::error::Problem::Missing) when `value`
/// is empty or whitespace-only.
pub fn require(field: &str, value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    Err(ValidationError::missing(field))
  } else {
    Ok(())
  }
}

/// Fail unless `min <= value <= max`.
pub fn require_range(
  field: &str,
  value: i64,
  min: i64,
  max: i64,
) -> Result<(), ValidationError> {
  if (min..=max).contains(&value) {
    Ok(())
  } else {
    Err(ValidationError::new(
      field,
      crate::error::Problem::OutOfRange { min, max, actual: value },
    ))
  }
}

/// Sort records for presentation: ascending display order, ties keep their
/// incoming order.
pub fn sort_for_display<E: Listed>(records: &mut [crate::record::Record<E>]) {
  records.sort_by_key(|r| r.data.display_order());
}
