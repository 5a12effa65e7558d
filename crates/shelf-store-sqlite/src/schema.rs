//! SQL schema for the Shelf SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` matters: ids must be strictly increasing and never
/// reused, even after the row with the highest id is deleted. A plain
/// rowid column would recycle freed ids.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS bookmarks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL UNIQUE,
    url         TEXT NOT NULL UNIQUE,
    tags        TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    notes       TEXT NOT NULL DEFAULT '',
    document    TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,               -- RFC 3339 UTC
    updated_at  TEXT NOT NULL                -- RFC 3339 UTC
);

PRAGMA user_version = 1;
";
