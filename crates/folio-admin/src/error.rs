//! Reasons a write is refused before it reaches the store.

use folio_core::{Collection, RecordId, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
  #[error("{0}")]
  Invalid(#[from] ValidationError),

  /// The collection has not finished loading, or its load failed.
  #[error("{} is not loaded", .0.label())]
  NotReady(Collection),

  #[error("{} record {id} already has a write in flight", .collection.label())]
  Busy { collection: Collection, id: RecordId },

  /// A singleton save, or any write when reloading, is still in flight.
  #[error("{} has a write in flight", .0.label())]
  Pending(Collection),

  #[error("an add to {} is already in flight", .0.label())]
  AddInFlight(Collection),

  #[error("{} has no record {id}", .collection.label())]
  UnknownRecord { collection: Collection, id: RecordId },

  /// A form was submitted against a target its collection cannot take.
  #[error("cannot submit this form to {}", .0.label())]
  WrongTarget(Collection),
}
