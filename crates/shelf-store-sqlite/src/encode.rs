//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings; tags as a compact JSON
//! array. Corrupt stored values decode to [`Error::Storage`] — the `Format`
//! kind is reserved for user-supplied CSV input.

use chrono::{DateTime, Utc};
use shelf_core::{
  Error, Result,
  bookmark::{Bookmark, BookmarkSummary},
};

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Storage(Box::new(e)))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> {
  serde_json::to_string(tags).map_err(|e| Error::Storage(Box::new(e)))
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  serde_json::from_str(s).map_err(|e| Error::Storage(Box::new(e)))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `bookmarks` row.
pub struct RawBookmark {
  pub id:         i64,
  pub title:      String,
  pub url:        String,
  pub tags:       String,
  pub notes:      String,
  pub document:   String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawBookmark {
  /// Column order must match the full-row SELECT lists in `store.rs`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawBookmark {
      id:         row.get(0)?,
      title:      row.get(1)?,
      url:        row.get(2)?,
      tags:       row.get(3)?,
      notes:      row.get(4)?,
      document:   row.get(5)?,
      created_at: row.get(6)?,
      updated_at: row.get(7)?,
    })
  }

  pub fn into_bookmark(self) -> Result<Bookmark> {
    Ok(Bookmark {
      id:         self.id,
      title:      self.title,
      url:        self.url,
      tags:       decode_tags(&self.tags)?,
      notes:      self.notes,
      document:   self.document,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings for the narrow listing projection.
pub struct RawSummary {
  pub id:         i64,
  pub title:      String,
  pub url:        String,
  pub tags:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawSummary {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawSummary {
      id:         row.get(0)?,
      title:      row.get(1)?,
      url:        row.get(2)?,
      tags:       row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_summary(self) -> Result<BookmarkSummary> {
    Ok(BookmarkSummary {
      id:         self.id,
      title:      self.title,
      url:        self.url,
      tags:       decode_tags(&self.tags)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
