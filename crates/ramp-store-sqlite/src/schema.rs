//! SQL schema for the Ramp overlay store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per overlay point. The UNIQUE point_id doubles as the
-- point -> partition index, so a point can only ever live in one partition.
-- Rows are never deleted.
CREATE TABLE IF NOT EXISTS overlay_points (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    point_id     TEXT NOT NULL UNIQUE,
    location_key TEXT NOT NULL,        -- exact search string, no normalisation
    point_json   TEXT NOT NULL,        -- full AccessibilityPoint wire form
    created_at   TEXT NOT NULL,        -- ISO 8601 UTC
    updated_at   TEXT NOT NULL         -- ISO 8601 UTC
);

CREATE INDEX IF NOT EXISTS overlay_location_idx ON overlay_points(location_key, seq);

PRAGMA user_version = 1;
";
