//! The `ContentStore` trait.
//!
//! The trait is implemented by storage backends (`folio-store-sqlite`,
//! `folio-store-local`, `folio-store-http`). Higher layers (`folio-api`,
//! `folio-admin`) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  entity::{Entity, Listed, Singleton},
  error::Classify,
  record::{Record, RecordId},
};

/// Abstraction over a portfolio content backend.
///
/// Every operation is typed by the entity, which fixes the collection.
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContentStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Records of a list collection sorted by ascending display order, ties in
  /// insertion order. Soft-deleted records are included only when
  /// `include_hidden` is set.
  fn list<E: Listed>(
    &self,
    include_hidden: bool,
  ) -> impl Future<Output = Result<Vec<Record<E>>, Self::Error>> + Send + '_;

  /// Active records only; see [`ContentStore::list`].
  fn list_all<E: Listed>(
    &self,
  ) -> impl Future<Output = Result<Vec<Record<E>>, Self::Error>> + Send + '_ {
    self.list::<E>(false)
  }

  /// The first record of a singleton collection, or `None` when no row
  /// exists yet.
  fn get_singleton<E: Singleton>(
    &self,
  ) -> impl Future<Output = Result<Option<Record<E>>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new record. The store assigns `id`, `created_at` and
  /// `updated_at`. Fails with a validation error when required fields are
  /// absent.
  fn insert<E: Listed>(
    &self,
    payload: E,
  ) -> impl Future<Output = Result<Record<E>, Self::Error>> + Send + '_;

  /// Replace the payload of an existing record. Fails with not-found if `id`
  /// does not exist in the entity's collection.
  fn update<E: Entity>(
    &self,
    id: RecordId,
    payload: E,
  ) -> impl Future<Output = Result<Record<E>, Self::Error>> + Send + '_;

  /// Insert the singleton if absent, otherwise update the existing row.
  fn upsert<E: Singleton>(
    &self,
    payload: E,
  ) -> impl Future<Output = Result<Record<E>, Self::Error>> + Send + '_;

  /// Hard-delete a record. Fails with not-found if it is already absent.
  fn delete<E: Entity>(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
