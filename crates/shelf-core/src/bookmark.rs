//! Bookmark — the record the whole system revolves around.
//!
//! Three input shapes feed the store: [`NewBookmark`] for interactive
//! creation, [`Bookmark`] itself for full-record updates, and
//! [`ImportedBookmark`] for bulk ingest (which carries source timestamps
//! the interactive path must not accept).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Store-assigned identifier. Strictly increasing; never reused, even
/// after the record it belonged to is deleted.
pub type BookmarkId = i64;

/// A stored bookmark.
///
/// `title` and `url` are each unique across the store. `tags` is always
/// present (an empty list when none were given) and serialises as a JSON
/// array, never null. `document` is an opaque payload reserved for page
/// content; it is persisted verbatim and never validated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Bookmark {
  pub id:         BookmarkId,
  #[validate(length(min = 1, message = "must not be empty"))]
  pub title:      String,
  #[validate(length(min = 1, message = "must not be empty"))]
  pub url:        String,
  #[serde(default)]
  pub tags:       Vec<String>,
  #[serde(default)]
  pub notes:      String,
  #[serde(default)]
  pub document:   String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Bookmark {
  /// Check required fields, reporting the complete set of failures.
  pub fn check(&self) -> crate::Result<()> {
    self.validate()?;
    Ok(())
  }
}

/// Input for [`BookmarkStore::add`](crate::store::BookmarkStore::add).
/// The store assigns the id and both timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBookmark {
  #[validate(length(min = 1, message = "must not be empty"))]
  pub title: String,
  #[validate(length(min = 1, message = "must not be empty"))]
  pub url:   String,
  #[serde(default)]
  pub tags:  Vec<String>,
  #[serde(default)]
  pub notes: String,
}

impl NewBookmark {
  /// Check required fields, reporting the complete set of failures.
  pub fn check(&self) -> crate::Result<()> {
    self.validate()?;
    Ok(())
  }
}

/// Input for [`BookmarkStore::import`](crate::store::BookmarkStore::import).
///
/// Unlike [`NewBookmark`] this carries the source file's timestamps and
/// document, which are preserved verbatim. The id is still assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportedBookmark {
  #[validate(length(min = 1, message = "must not be empty"))]
  pub title:      String,
  #[validate(length(min = 1, message = "must not be empty"))]
  pub url:        String,
  #[serde(default)]
  pub tags:       Vec<String>,
  #[serde(default)]
  pub notes:      String,
  #[serde(default)]
  pub document:   String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl ImportedBookmark {
  /// Check required fields, reporting the complete set of failures.
  pub fn check(&self) -> crate::Result<()> {
    self.validate()?;
    Ok(())
  }
}

/// Listing projection: everything except `notes` and `document`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkSummary {
  pub id:         BookmarkId,
  pub title:      String,
  pub url:        String,
  pub tags:       Vec<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
