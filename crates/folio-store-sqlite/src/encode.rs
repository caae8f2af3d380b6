//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, payloads as compact JSON and
//! record ids as hyphenated lowercase UUID strings.

use chrono::{DateTime, Utc};
use folio_core::{Record, RecordId};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Ids ──────────────────────────────────────────────────────────────────────

pub fn new_record_id() -> RecordId { RecordId::new(Uuid::new_v4().hyphenated().to_string()) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Payload ──────────────────────────────────────────────────────────────────

/// Column values derived from a payload.
pub struct EncodedPayload {
  pub json:          String,
  pub display_order: i64,
  pub is_active:     bool,
}

/// Serialise a payload and copy out its presentation columns. Singletons have
/// neither field and get `0` / `true`.
pub fn encode_payload<E: Serialize>(payload: &E) -> Result<EncodedPayload> {
  let value = serde_json::to_value(payload)?;
  let display_order = value
    .get("display_order")
    .and_then(serde_json::Value::as_i64)
    .unwrap_or(0);
  let is_active = value
    .get("is_active")
    .and_then(serde_json::Value::as_bool)
    .unwrap_or(true);
  Ok(EncodedPayload { json: value.to_string(), display_order, is_active })
}

// ─── Raw rows ─────────────────────────────────────────────────────────────────

/// Flat representation of a `records` row before payload decoding.
pub struct RawRecord {
  pub record_id:  String,
  pub payload:    String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawRecord {
  /// Columns: `record_id, payload, created_at, updated_at`.
  pub const COLUMNS: &'static str = "record_id, payload, created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:  row.get(0)?,
      payload:    row.get(1)?,
      created_at: row.get(2)?,
      updated_at: row.get(3)?,
    })
  }

  pub fn into_record<E: DeserializeOwned>(self) -> Result<Record<E>> {
    Ok(Record {
      id:         RecordId::new(self.record_id),
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      data:       serde_json::from_str(&self.payload)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use folio_core::content::{Profile, Project};

  use super::*;

  #[test]
  fn presentation_columns_come_from_payload() {
    let project = Project { display_order: 7, is_active: false, ..Project::default() };
    let encoded = encode_payload(&project).unwrap();
    assert_eq!(encoded.display_order, 7);
    assert!(!encoded.is_active);
  }

  #[test]
  fn singletons_use_default_presentation() {
    let encoded = encode_payload(&Profile::default()).unwrap();
    assert_eq!(encoded.display_order, 0);
    assert!(encoded.is_active);
  }

  #[test]
  fn dt_round_trip() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }
}
