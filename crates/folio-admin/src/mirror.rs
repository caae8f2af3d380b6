//! In-memory mirrors of store collections.
//!
//! A mirror only changes when a store call has been acknowledged; failed
//! writes leave it exactly as it was.

use std::{collections::HashSet, fmt::Display};

use folio_core::{
  Classify, Collection, FailureKind, Listed, Record, RecordId, Singleton,
  entity::sort_for_display,
};
use serde_json::Value;

use crate::{Notice, SubmitError};

// ─── Phase ───────────────────────────────────────────────────────────────────

/// A store failure reduced to what the panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
  pub kind:    FailureKind,
  pub message: String,
}

impl Failure {
  pub fn from_error<E: Classify + Display>(e: &E) -> Self {
    Self { kind: e.kind(), message: e.to_string() }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
  #[default]
  Unloaded,
  Loading,
  Loaded,
  Failed(Failure),
}

/// What the panel shows for one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Unloaded,
  Loading,
  Loaded,
  /// Loaded, with at least one write in flight.
  Mutating,
  Error,
}

impl Phase {
  pub fn is_settled(self) -> bool { !matches!(self, Self::Unloaded | Self::Loading) }
}

/// One line of a collection listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
  pub id:            RecordId,
  pub label:         String,
  pub display_order: u32,
  pub active:        bool,
  /// A write for this record is in flight.
  pub pending:       bool,
}

/// Object-safe view of a mirror, used where the collection is only known at
/// runtime.
pub trait MirrorView {
  fn collection(&self) -> Collection;

  fn phase(&self) -> Phase;

  fn failure(&self) -> Option<&Failure>;

  fn rows(&self) -> Vec<RowView>;

  /// The record serialised flat, for detail panes and edit forms.
  fn record_json(&self, id: &RecordId) -> Option<Value>;
}

// ─── Lists ───────────────────────────────────────────────────────────────────

/// Mirror of a list collection, kept in the order the store lists it.
///
/// Equal display orders are broken by insertion order. Loads and adds keep
/// that without help; a save that moves a record needs the store's listing.
#[derive(Debug)]
pub struct CollectionMirror<E> {
  records: Vec<Record<E>>,
  load:    LoadState,
  pending: HashSet<RecordId>,
  adding:  bool,
}

impl<E> Default for CollectionMirror<E> {
  fn default() -> Self {
    Self {
      records: Vec::new(),
      load:    LoadState::Unloaded,
      pending: HashSet::new(),
      adding:  false,
    }
  }
}

impl<E: Listed> CollectionMirror<E> {
  pub fn records(&self) -> &[Record<E>] { &self.records }

  pub fn load_state(&self) -> &LoadState { &self.load }

  pub fn get(&self, id: &RecordId) -> Option<&Record<E>> {
    self.records.iter().find(|r| &r.id == id)
  }

  pub fn is_pending(&self, id: &RecordId) -> bool { self.pending.contains(id) }

  pub fn is_adding(&self) -> bool { self.adding }

  // ── Loading ───────────────────────────────────────────────────────────────

  pub(crate) fn begin_load(&mut self) {
    self.load = LoadState::Loading;
    self.pending.clear();
    self.adding = false;
  }

  /// A failed read empties the mirror; stale rows are never shown as current.
  pub(crate) fn finish_load(
    &mut self,
    result: Result<Vec<Record<E>>, Failure>,
  ) -> Option<Notice> {
    match result {
      Ok(mut records) => {
        sort_for_display(&mut records);
        self.records = records;
        self.load = LoadState::Loaded;
        None
      }
      Err(failure) => {
        tracing::warn!(collection = %E::COLLECTION, error = %failure.message, "load failed");
        self.records.clear();
        let notice = Notice::error(format!(
          "Could not load {}: {}",
          E::COLLECTION.label(),
          failure.message
        ));
        self.load = LoadState::Failed(failure);
        Some(notice)
      }
    }
  }

  // ── Write bookkeeping ─────────────────────────────────────────────────────

  fn ensure_loaded(&self) -> Result<(), SubmitError> {
    match self.load {
      LoadState::Loaded => Ok(()),
      _ => Err(SubmitError::NotReady(E::COLLECTION)),
    }
  }

  pub(crate) fn begin_add(&mut self) -> Result<(), SubmitError> {
    self.ensure_loaded()?;
    if self.adding {
      return Err(SubmitError::AddInFlight(E::COLLECTION));
    }
    self.adding = true;
    Ok(())
  }

  pub(crate) fn begin_write(&mut self, id: &RecordId) -> Result<(), SubmitError> {
    self.ensure_loaded()?;
    if self.get(id).is_none() {
      return Err(SubmitError::UnknownRecord { collection: E::COLLECTION, id: id.clone() });
    }
    if !self.pending.insert(id.clone()) {
      return Err(SubmitError::Busy { collection: E::COLLECTION, id: id.clone() });
    }
    Ok(())
  }

  // ── Acknowledged results ──────────────────────────────────────────────────

  pub(crate) fn finish_add(&mut self, record: Record<E>) {
    self.adding = false;
    self.records.push(record);
    sort_for_display(&mut self.records);
  }

  pub(crate) fn abandon_add(&mut self) { self.adding = false; }

  pub(crate) fn finish_write(&mut self, id: &RecordId) { self.pending.remove(id); }

  /// Swap in an acknowledged payload. The row keeps its place unless its
  /// display order changed, in which case it is re-sorted.
  pub(crate) fn replace(&mut self, record: Record<E>) {
    if let Some(slot) = self.records.iter_mut().find(|r| r.id == record.id) {
      let moved = slot.data.display_order() != record.data.display_order();
      *slot = record;
      if moved {
        sort_for_display(&mut self.records);
      }
    }
  }

  /// Put the rows in the order of `listed`, the ids as the store returned
  /// them. Rows missing from `listed` were added after it was taken, so they
  /// follow every listed row of the same display order.
  pub(crate) fn adopt_order(&mut self, listed: &[RecordId]) {
    self.records.sort_by_key(|r| {
      let position = listed.iter().position(|id| id == &r.id).unwrap_or(usize::MAX);
      (r.data.display_order(), position)
    });
  }

  pub(crate) fn remove(&mut self, id: &RecordId) {
    self.records.retain(|r| &r.id != id);
  }
}

impl<E: Listed> MirrorView for CollectionMirror<E> {
  fn collection(&self) -> Collection { E::COLLECTION }

  fn phase(&self) -> Phase {
    match &self.load {
      LoadState::Unloaded => Phase::Unloaded,
      LoadState::Loading => Phase::Loading,
      LoadState::Failed(_) => Phase::Error,
      LoadState::Loaded if self.adding || !self.pending.is_empty() => Phase::Mutating,
      LoadState::Loaded => Phase::Loaded,
    }
  }

  fn failure(&self) -> Option<&Failure> {
    match &self.load {
      LoadState::Failed(f) => Some(f),
      _ => None,
    }
  }

  fn rows(&self) -> Vec<RowView> {
    self
      .records
      .iter()
      .map(|r| RowView {
        id:            r.id.clone(),
        label:         r.data.label().to_owned(),
        display_order: r.data.display_order(),
        active:        r.data.is_active(),
        pending:       self.pending.contains(&r.id),
      })
      .collect()
  }

  fn record_json(&self, id: &RecordId) -> Option<Value> {
    self.get(id).and_then(|r| serde_json::to_value(r).ok())
  }
}

// ─── Singletons ──────────────────────────────────────────────────────────────

/// Mirror of a singleton collection.
#[derive(Debug)]
pub struct SingletonMirror<E> {
  record:  Option<Record<E>>,
  load:    LoadState,
  pending: bool,
}

impl<E> Default for SingletonMirror<E> {
  fn default() -> Self { Self { record: None, load: LoadState::Unloaded, pending: false } }
}

impl<E: Singleton> SingletonMirror<E> {
  pub fn record(&self) -> Option<&Record<E>> { self.record.as_ref() }

  pub fn load_state(&self) -> &LoadState { &self.load }

  pub fn is_pending(&self) -> bool { self.pending }

  pub(crate) fn begin_load(&mut self) {
    self.load = LoadState::Loading;
    self.pending = false;
  }

  pub(crate) fn finish_load(
    &mut self,
    result: Result<Option<Record<E>>, Failure>,
  ) -> Option<Notice> {
    match result {
      Ok(record) => {
        self.record = record;
        self.load = LoadState::Loaded;
        None
      }
      Err(failure) => {
        tracing::warn!(collection = %E::COLLECTION, error = %failure.message, "load failed");
        self.record = None;
        let notice = Notice::error(format!(
          "Could not load {}: {}",
          E::COLLECTION.label(),
          failure.message
        ));
        self.load = LoadState::Failed(failure);
        Some(notice)
      }
    }
  }

  pub(crate) fn begin_write(&mut self) -> Result<(), SubmitError> {
    if self.load != LoadState::Loaded {
      return Err(SubmitError::NotReady(E::COLLECTION));
    }
    if self.pending {
      return Err(SubmitError::Pending(E::COLLECTION));
    }
    self.pending = true;
    Ok(())
  }

  pub(crate) fn finish_write(&mut self, result: Option<Record<E>>) {
    self.pending = false;
    if let Some(record) = result {
      self.record = Some(record);
    }
  }
}

impl<E: Singleton> MirrorView for SingletonMirror<E> {
  fn collection(&self) -> Collection { E::COLLECTION }

  fn phase(&self) -> Phase {
    match &self.load {
      LoadState::Unloaded => Phase::Unloaded,
      LoadState::Loading => Phase::Loading,
      LoadState::Failed(_) => Phase::Error,
      LoadState::Loaded if self.pending => Phase::Mutating,
      LoadState::Loaded => Phase::Loaded,
    }
  }

  fn failure(&self) -> Option<&Failure> {
    match &self.load {
      LoadState::Failed(f) => Some(f),
      _ => None,
    }
  }

  fn rows(&self) -> Vec<RowView> {
    self
      .record
      .iter()
      .map(|r| RowView {
        id:            r.id.clone(),
        label:         r.data.label().to_owned(),
        display_order: 0,
        active:        true,
        pending:       self.pending,
      })
      .collect()
  }

  fn record_json(&self, id: &RecordId) -> Option<Value> {
    self
      .record
      .as_ref()
      .filter(|r| &r.id == id)
      .and_then(|r| serde_json::to_value(r).ok())
  }
}

#[cfg(test)]
mod tests {
  use folio_core::content::Skill;

  use super::*;

  fn record(id: &str, name: &str, order: u32) -> Record<Skill> {
    Record::stamped(
      RecordId::from(id),
      Skill { name: name.into(), display_order: order, ..Skill::default() },
    )
  }

  fn loaded(records: Vec<Record<Skill>>) -> CollectionMirror<Skill> {
    let mut mirror = CollectionMirror::default();
    mirror.begin_load();
    mirror.finish_load(Ok(records));
    mirror
  }

  #[test]
  fn added_record_is_sorted_into_place_after_equal_orders() {
    let mut mirror = loaded(vec![record("1", "a", 0), record("2", "b", 1), record("3", "c", 2)]);
    mirror.begin_add().unwrap();
    mirror.finish_add(record("4", "d", 1));

    let names: Vec<_> = mirror.records().iter().map(|r| r.data.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "d", "c"]);
    assert_eq!(mirror.phase(), Phase::Loaded);
  }

  #[test]
  fn second_write_to_same_record_is_busy() {
    let mut mirror = loaded(vec![record("1", "a", 0)]);
    let id = RecordId::from("1");
    mirror.begin_write(&id).unwrap();
    assert_eq!(mirror.phase(), Phase::Mutating);
    assert!(matches!(mirror.begin_write(&id), Err(SubmitError::Busy { .. })));

    mirror.finish_write(&id);
    assert!(mirror.begin_write(&id).is_ok());
  }

  #[test]
  fn writes_are_refused_until_loaded() {
    let mut mirror = CollectionMirror::<Skill>::default();
    assert!(matches!(mirror.begin_add(), Err(SubmitError::NotReady(_))));
    mirror.begin_load();
    assert!(matches!(mirror.begin_add(), Err(SubmitError::NotReady(_))));
  }

  #[test]
  fn failed_load_clears_records() {
    let mut mirror = loaded(vec![record("1", "a", 0)]);
    mirror.begin_load();
    let notice = mirror.finish_load(Err(Failure {
      kind:    FailureKind::Unavailable,
      message: "offline".into(),
    }));
    assert!(notice.is_some());
    assert!(mirror.records().is_empty());
    assert_eq!(mirror.phase(), Phase::Error);
    assert_eq!(mirror.failure().unwrap().message, "offline");
  }

  #[test]
  fn replace_updates_payload_and_order() {
    let mut mirror = loaded(vec![record("1", "a", 0), record("2", "b", 1)]);
    mirror.replace(record("1", "renamed", 5));
    let rows = mirror.rows();
    assert_eq!(rows[1].label, "renamed");
    assert_eq!(rows[1].display_order, 5);
  }

  #[test]
  fn adopted_order_breaks_display_order_ties() {
    let mut mirror = loaded(vec![record("2", "b", 0), record("1", "a", 1)]);
    mirror.replace(record("1", "a", 0));
    mirror.adopt_order(&[RecordId::from("1"), RecordId::from("2")]);

    let names: Vec<_> = mirror.records().iter().map(|r| r.data.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
  }

  #[test]
  fn rows_added_after_a_listing_follow_listed_ties() {
    let mut mirror = loaded(vec![record("1", "a", 0), record("2", "b", 1)]);
    mirror.begin_add().unwrap();
    mirror.finish_add(record("3", "c", 0));
    mirror.adopt_order(&[RecordId::from("1"), RecordId::from("2")]);

    let names: Vec<_> = mirror.records().iter().map(|r| r.data.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c", "b"]);
  }

  #[test]
  fn unknown_record_is_rejected() {
    let mut mirror = loaded(vec![]);
    assert!(matches!(
      mirror.begin_write(&RecordId::from("x")),
      Err(SubmitError::UnknownRecord { .. })
    ));
  }
}
