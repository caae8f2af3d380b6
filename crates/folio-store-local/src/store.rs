//! [`LocalStore`]: a directory of JSON arrays implementing [`ContentStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
};

use chrono::Utc;
use folio_core::{
  Entity, Listed, Record, RecordId, Singleton, entity::sort_for_display,
  store::ContentStore,
};
use tokio::sync::Mutex;

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio content store kept as one JSON file per collection.
///
/// All file access goes through one async mutex, so read-modify-write cycles
/// never interleave within a process.
pub struct LocalStore {
  dir:   PathBuf,
  clock: Mutex<IdClock>,
}

/// Issues millisecond-timestamp ids that never repeat within a process.
struct IdClock {
  last: i64,
}

impl IdClock {
  fn next(&mut self, taken: impl Fn(&str) -> bool) -> RecordId {
    let mut candidate = Utc::now().timestamp_millis().max(self.last + 1);
    while taken(&candidate.to_string()) {
      candidate += 1;
    }
    self.last = candidate;
    RecordId::new(candidate.to_string())
  }
}

impl LocalStore {
  /// Open a store rooted at `dir`, creating the directory if needed.
  pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
    let dir = dir.as_ref().to_path_buf();
    tokio::fs::create_dir_all(&dir)
      .await
      .map_err(|source| Error::Io { path: dir.clone(), source })?;
    tracing::debug!(dir = %dir.display(), "opened local store");
    Ok(Self { dir, clock: Mutex::new(IdClock { last: 0 }) })
  }

  pub fn dir(&self) -> &Path { &self.dir }

  fn path_for<E: Entity>(&self) -> PathBuf {
    self.dir.join(format!("{}.json", E::COLLECTION.key()))
  }

  /// Read a whole collection. A missing file is an empty collection.
  async fn read<E: Entity>(&self) -> Result<Vec<Record<E>>> {
    let path = self.path_for::<E>();
    let bytes = match tokio::fs::read(&path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
      Err(source) => return Err(Error::Io { path, source }),
    };
    serde_json::from_slice(&bytes).map_err(|source| Error::Corrupt { path, source })
  }

  /// Replace a collection file: write a sibling temp file, then rename it
  /// over the live file.
  async fn write<E: Entity>(&self, records: &[Record<E>]) -> Result<()> {
    let path = self.path_for::<E>();
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(records)?;

    tokio::fs::write(&tmp, bytes)
      .await
      .map_err(|source| Error::Io { path: tmp.clone(), source })?;
    tokio::fs::rename(&tmp, &path)
      .await
      .map_err(|source| Error::Io { path, source })?;
    Ok(())
  }
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for LocalStore {
  type Error = Error;

  async fn list<E: Listed>(&self, include_hidden: bool) -> Result<Vec<Record<E>>> {
    let _guard = self.clock.lock().await;
    let mut records: Vec<Record<E>> = self
      .read::<E>()
      .await?
      .into_iter()
      .filter(|r| include_hidden || r.data.is_active())
      .collect();
    sort_for_display(&mut records);
    Ok(records)
  }

  async fn get_singleton<E: Singleton>(&self) -> Result<Option<Record<E>>> {
    let _guard = self.clock.lock().await;
    Ok(self.read::<E>().await?.into_iter().next())
  }

  async fn insert<E: Listed>(&self, payload: E) -> Result<Record<E>> {
    payload.validate()?;

    let mut clock = self.clock.lock().await;
    let mut records = self.read::<E>().await?;
    let id = clock.next(|candidate| records.iter().any(|r| r.id.as_str() == candidate));

    let record = Record::stamped(id, payload);
    records.push(record.clone());
    self.write(&records).await?;

    tracing::debug!(collection = %E::COLLECTION, id = %record.id, "inserted record");
    Ok(record)
  }

  async fn update<E: Entity>(&self, id: RecordId, payload: E) -> Result<Record<E>> {
    payload.validate()?;

    let _guard = self.clock.lock().await;
    let mut records = self.read::<E>().await?;
    let Some(slot) = records.iter_mut().find(|r| r.id == id) else {
      return Err(Error::NotFound { collection: E::COLLECTION, id });
    };

    slot.data = payload;
    slot.updated_at = Utc::now();
    let updated = slot.clone();
    self.write(&records).await?;
    Ok(updated)
  }

  async fn upsert<E: Singleton>(&self, payload: E) -> Result<Record<E>> {
    payload.validate()?;

    let mut clock = self.clock.lock().await;
    let mut records = self.read::<E>().await?;

    let record = match records.first_mut() {
      Some(existing) => {
        existing.data = payload;
        existing.updated_at = Utc::now();
        existing.clone()
      }
      None => {
        let record = Record::stamped(clock.next(|_| false), payload);
        records.push(record.clone());
        record
      }
    };

    self.write(&records).await?;
    Ok(record)
  }

  async fn delete<E: Entity>(&self, id: RecordId) -> Result<()> {
    let _guard = self.clock.lock().await;
    let mut records = self.read::<E>().await?;
    let before = records.len();
    records.retain(|r| r.id != id);

    if records.len() == before {
      return Err(Error::NotFound { collection: E::COLLECTION, id });
    }
    self.write(&records).await
  }
}
