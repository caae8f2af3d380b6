//! [`SqliteStore`]: the SQLite implementation of [`ContentStore`].

use std::path::Path;

use chrono::Utc;
use folio_core::{
  Entity, Listed, Record, RecordId, Singleton,
  store::ContentStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RawRecord, decode_dt, encode_dt, encode_payload, new_record_id},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio content store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built record into the `records` table.
  async fn insert_record<E: Entity>(&self, record: &Record<E>) -> Result<()> {
    let encoded        = encode_payload(&record.data)?;
    let record_id_str  = record.id.to_string();
    let collection     = E::COLLECTION.key();
    let created_at_str = encode_dt(record.created_at);
    let updated_at_str = encode_dt(record.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO records (
             record_id, collection, payload, display_order, is_active,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            record_id_str,
            collection,
            encoded.json,
            encoded.display_order,
            encoded.is_active,
            created_at_str,
            updated_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list<E: Listed>(&self, include_hidden: bool) -> Result<Vec<Record<E>>> {
    let collection = E::COLLECTION.key();

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM records
           WHERE collection = ?1 AND (?2 OR is_active = 1)
           ORDER BY display_order ASC, seq ASC",
          RawRecord::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![collection, include_hidden],
            RawRecord::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn get_singleton<E: Singleton>(&self) -> Result<Option<Record<E>>> {
    let collection = E::COLLECTION.key();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM records WHERE collection = ?1 ORDER BY seq ASC LIMIT 1",
          RawRecord::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![collection], RawRecord::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert<E: Listed>(&self, payload: E) -> Result<Record<E>> {
    payload.validate()?;

    let record = Record::stamped(new_record_id(), payload);
    self.insert_record(&record).await?;

    tracing::debug!(collection = %E::COLLECTION, id = %record.id, "inserted record");
    Ok(record)
  }

  async fn update<E: Entity>(&self, id: RecordId, payload: E) -> Result<Record<E>> {
    payload.validate()?;

    let encoded    = encode_payload(&payload)?;
    let collection = E::COLLECTION.key();
    let id_str     = id.to_string();
    let now        = Utc::now();
    let now_str    = encode_dt(now);

    let created_at: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "UPDATE records
               SET payload = ?1, display_order = ?2, is_active = ?3, updated_at = ?4
               WHERE collection = ?5 AND record_id = ?6
               RETURNING created_at",
              rusqlite::params![
                encoded.json,
                encoded.display_order,
                encoded.is_active,
                now_str,
                collection,
                id_str,
              ],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    let Some(created_at) = created_at else {
      return Err(Error::NotFound { collection: E::COLLECTION, id });
    };

    Ok(Record {
      id,
      created_at: decode_dt(&created_at)?,
      updated_at: now,
      data: payload,
    })
  }

  async fn upsert<E: Singleton>(&self, payload: E) -> Result<Record<E>> {
    payload.validate()?;

    let encoded     = encode_payload(&payload)?;
    let collection  = E::COLLECTION.key();
    let candidate   = new_record_id().to_string();
    let now         = Utc::now();
    let now_str     = encode_dt(now);

    // Read-then-write inside one transaction so two upserts can never
    // produce two rows.
    let (id_str, created_at): (String, String) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<(String, String)> = tx
          .query_row(
            "SELECT record_id, created_at FROM records
             WHERE collection = ?1 ORDER BY seq ASC LIMIT 1",
            rusqlite::params![collection],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        let out = match existing {
          Some((id, created_at)) => {
            tx.execute(
              "UPDATE records SET payload = ?1, updated_at = ?2 WHERE record_id = ?3",
              rusqlite::params![encoded.json, now_str, id],
            )?;
            (id, created_at)
          }
          None => {
            tx.execute(
              "INSERT INTO records (
                 record_id, collection, payload, display_order, is_active,
                 created_at, updated_at
               ) VALUES (?1, ?2, ?3, 0, 1, ?4, ?4)",
              rusqlite::params![candidate, collection, encoded.json, now_str],
            )?;
            (candidate, now_str)
          }
        };

        tx.commit()?;
        Ok(out)
      })
      .await?;

    Ok(Record {
      id:         RecordId::new(id_str),
      created_at: decode_dt(&created_at)?,
      updated_at: now,
      data:       payload,
    })
  }

  async fn delete<E: Entity>(&self, id: RecordId) -> Result<()> {
    let collection = E::COLLECTION.key();
    let id_str     = id.to_string();

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM records WHERE collection = ?1 AND record_id = ?2",
          rusqlite::params![collection, id_str],
        )?)
      })
      .await?;

    if removed == 0 {
      return Err(Error::NotFound { collection: E::COLLECTION, id });
    }
    Ok(())
  }
}
