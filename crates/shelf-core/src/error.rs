//! Error types for `shelf-core`.
//!
//! One closed enum for the whole store surface. Callers dispatch on the
//! variant (the HTTP adapter maps each to a status code); the payloads
//! carry enough detail to report without string inspection.

use thiserror::Error;

use crate::bookmark::BookmarkId;

#[derive(Debug, Error)]
pub enum Error {
  /// One or more required fields are empty. Carries the complete set of
  /// failing fields, not just the first one found.
  #[error("validation failed: {0}")]
  Validation(#[from] validator::ValidationErrors),

  #[error("title {0:?} is already used by another bookmark")]
  TitleTaken(String),

  #[error("url {0:?} is already bookmarked")]
  UrlTaken(String),

  #[error("bookmark not found: {0}")]
  NotFound(BookmarkId),

  #[error("no bookmark with url {0:?}")]
  UrlNotFound(String),

  /// Malformed CSV input: header mismatch, wrong field count, an
  /// unparsable timestamp, or an unterminated quoted field.
  #[error("csv format: {0}")]
  Format(String),

  /// Backend I/O failure or corrupt stored data. Not recoverable by the
  /// caller; surfaces as a 500 at the HTTP edge.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
