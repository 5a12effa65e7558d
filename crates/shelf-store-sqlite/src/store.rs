//! [`SqliteStore`] — the SQLite implementation of [`BookmarkStore`].
//!
//! Mutating operations run their uniqueness probes and the write inside a
//! single `call` closure wrapped in a transaction. The connection's worker
//! thread executes closures one at a time, so a probe can never interleave
//! with another caller's write. The UNIQUE columns in the schema remain as
//! a backstop.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use shelf_core::{
  Error, Result,
  bookmark::{
    Bookmark, BookmarkId, BookmarkSummary, ImportedBookmark, NewBookmark,
  },
  store::BookmarkStore,
};

use crate::{
  encode::{RawBookmark, RawSummary, decode_dt, encode_dt, encode_tags},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A bookmark store backed by a single SQLite file.
///
/// Clones share the same worker-thread connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open the database at `path`, creating it if missing, and apply the
  /// schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a store backed by an in-memory database, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(storage)?;
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
      .await
      .map_err(storage)
  }
}

/// Wrap a backend fault in the shared storage error variant.
fn storage(e: tokio_rusqlite::Error) -> Error { Error::Storage(Box::new(e)) }

/// True when a row other than `except` already holds `value` in `column`.
///
/// `column` is always a literal column name, never user input.
fn value_in_use(
  conn: &rusqlite::Connection,
  column: &str,
  value: &str,
  except: Option<BookmarkId>,
) -> rusqlite::Result<bool> {
  let hit: Option<i64> = match except {
    Some(id) => conn
      .query_row(
        &format!("SELECT id FROM bookmarks WHERE {column} = ?1 AND id != ?2"),
        rusqlite::params![value, id],
        |row| row.get(0),
      )
      .optional()?,
    None => conn
      .query_row(
        &format!("SELECT id FROM bookmarks WHERE {column} = ?1"),
        rusqlite::params![value],
        |row| row.get(0),
      )
      .optional()?,
  };
  Ok(hit.is_some())
}

// ─── BookmarkStore impl ──────────────────────────────────────────────────────

impl BookmarkStore for SqliteStore {
  async fn add(&self, input: NewBookmark) -> Result<Bookmark> {
    // Adding is importing with store-stamped timestamps: one clock read,
    // so a fresh record has created_at == updated_at.
    let now = Utc::now();
    let NewBookmark {
      title,
      url,
      tags,
      notes,
    } = input;
    self
      .import(ImportedBookmark {
        title,
        url,
        tags,
        notes,
        document: String::new(),
        created_at: now,
        updated_at: now,
      })
      .await
  }

  async fn update(&self, record: Bookmark) -> Result<Bookmark> {
    record.check()?;

    let now      = Utc::now();
    let now_str  = encode_dt(now);
    let tags_str = encode_tags(&record.tags)?;
    // Incoming timestamps are deliberately dropped here; the stored
    // created_at is re-read below and updated_at is stamped fresh.
    let Bookmark {
      id,
      title,
      url,
      tags,
      notes,
      document,
      ..
    } = record;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<String> = tx
          .query_row(
            "SELECT created_at FROM bookmarks WHERE id = ?1",
            rusqlite::params![id],
            |row| row.get(0),
          )
          .optional()?;
        let Some(created_at_str) = existing else {
          return Ok(Err(Error::NotFound(id)));
        };
        let created_at = match decode_dt(&created_at_str) {
          Ok(dt) => dt,
          Err(e) => return Ok(Err(e)),
        };

        if value_in_use(&tx, "title", &title, Some(id))? {
          return Ok(Err(Error::TitleTaken(title)));
        }
        if value_in_use(&tx, "url", &url, Some(id))? {
          return Ok(Err(Error::UrlTaken(url)));
        }

        tx.execute(
          "UPDATE bookmarks
           SET title = ?1, url = ?2, tags = ?3, notes = ?4, document = ?5,
               updated_at = ?6
           WHERE id = ?7",
          rusqlite::params![title, url, tags_str, notes, document, now_str, id],
        )?;
        tx.commit()?;

        Ok(Ok(Bookmark {
          id,
          title,
          url,
          tags,
          notes,
          document,
          created_at,
          updated_at: now,
        }))
      })
      .await
      .map_err(storage)?
  }

  async fn delete(&self, id: BookmarkId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "DELETE FROM bookmarks WHERE id = ?1",
          rusqlite::params![id],
        )?;
        if affected == 0 {
          return Ok(Err(Error::NotFound(id)));
        }
        Ok(Ok(()))
      })
      .await
      .map_err(storage)?
  }

  async fn get(&self, id: BookmarkId) -> Result<Bookmark> {
    let raw: Option<RawBookmark> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, title, url, tags, notes, document, created_at,
                      updated_at
               FROM bookmarks WHERE id = ?1",
              rusqlite::params![id],
              RawBookmark::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(storage)?;

    match raw {
      Some(raw) => raw.into_bookmark(),
      None => Err(Error::NotFound(id)),
    }
  }

  async fn get_by_url(&self, url: &str) -> Result<Bookmark> {
    let needle = url.to_string();
    let raw: Option<RawBookmark> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, title, url, tags, notes, document, created_at,
                      updated_at
               FROM bookmarks WHERE url = ?1",
              rusqlite::params![needle],
              RawBookmark::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(storage)?;

    match raw {
      Some(raw) => raw.into_bookmark(),
      None => Err(Error::UrlNotFound(url.to_string())),
    }
  }

  async fn list(&self) -> Result<Vec<BookmarkSummary>> {
    let raws: Vec<RawSummary> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, title, url, tags, created_at, updated_at
           FROM bookmarks ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], RawSummary::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(storage)?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn import(&self, record: ImportedBookmark) -> Result<Bookmark> {
    record.check()?;

    let tags_str    = encode_tags(&record.tags)?;
    let created_str = encode_dt(record.created_at);
    let updated_str = encode_dt(record.updated_at);
    let ImportedBookmark {
      title,
      url,
      tags,
      notes,
      document,
      created_at,
      updated_at,
    } = record;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if value_in_use(&tx, "title", &title, None)? {
          return Ok(Err(Error::TitleTaken(title)));
        }
        if value_in_use(&tx, "url", &url, None)? {
          return Ok(Err(Error::UrlTaken(url)));
        }

        tx.execute(
          "INSERT INTO bookmarks
             (title, url, tags, notes, document, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            title,
            url,
            tags_str,
            notes,
            document,
            created_str,
            updated_str,
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Ok(Bookmark {
          id,
          title,
          url,
          tags,
          notes,
          document,
          created_at,
          updated_at,
        }))
      })
      .await
      .map_err(storage)?
  }
}
