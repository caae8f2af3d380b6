//! SQL schema for the Folio SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per record across every collection. The payload is the entity's
-- JSON; display_order and is_active are copied out of it for sorting and
-- filtering.
CREATE TABLE IF NOT EXISTS records (
    seq           INTEGER PRIMARY KEY AUTOINCREMENT,  -- insertion order
    record_id     TEXT NOT NULL UNIQUE,
    collection    TEXT NOT NULL,
    payload       TEXT NOT NULL,
    display_order INTEGER NOT NULL DEFAULT 0 CHECK (display_order >= 0),
    is_active     INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1)),
    created_at    TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS records_order_idx
    ON records(collection, display_order, seq);

-- Singleton collections hold at most one row.
CREATE UNIQUE INDEX IF NOT EXISTS records_singleton_idx
    ON records(collection)
    WHERE collection IN ('hero_content', 'about_content');

PRAGMA user_version = 1;
";
