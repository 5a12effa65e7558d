//! The `BookmarkStore` trait.
//!
//! Implemented by storage backends (e.g. `shelf-store-sqlite`). Higher
//! layers (`shelf-api`, `shelf-cli`) depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  bookmark::{
    Bookmark, BookmarkId, BookmarkSummary, ImportedBookmark, NewBookmark,
  },
  error::Result,
};

/// Abstraction over a bookmark store backend.
///
/// Implementations must make each check-then-write sequence (uniqueness
/// probe plus insert or update) atomic with respect to concurrent
/// callers, and must assign ids that are strictly increasing and never
/// reused, even after deletion.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Dropping a
/// returned future abandons the operation.
pub trait BookmarkStore: Send + Sync {
  /// Validate and persist a new bookmark.
  ///
  /// Assigns the next id, stamps `created_at` and `updated_at` from the
  /// same clock read (equal on a fresh record), and rejects duplicate
  /// titles and urls with [`Error::TitleTaken`](crate::Error::TitleTaken)
  /// / [`Error::UrlTaken`](crate::Error::UrlTaken), leaving the store
  /// unchanged.
  fn add(
    &self,
    input: NewBookmark,
  ) -> impl Future<Output = Result<Bookmark>> + Send + '_;

  /// Replace a stored bookmark wholesale.
  ///
  /// The incoming record is validated as if new. Its id addresses the
  /// stored row; `created_at` and `updated_at` on the input are ignored
  /// (the stored `created_at` is preserved, `updated_at` is stamped
  /// fresh). Uniqueness checks exclude the record itself, so re-saving
  /// unchanged values succeeds.
  fn update(
    &self,
    record: Bookmark,
  ) -> impl Future<Output = Result<Bookmark>> + Send + '_;

  /// Hard-delete a bookmark. Fails with
  /// [`Error::NotFound`](crate::Error::NotFound) when absent, so a
  /// second delete of the same id fails.
  fn delete(
    &self,
    id: BookmarkId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Fetch a bookmark by id.
  fn get(
    &self,
    id: BookmarkId,
  ) -> impl Future<Output = Result<Bookmark>> + Send + '_;

  /// Fetch a bookmark by exact url match.
  fn get_by_url<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<Bookmark>> + Send + 'a;

  /// List every bookmark as a [`BookmarkSummary`], in insertion (id)
  /// order. An empty store yields an empty vec.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<BookmarkSummary>>> + Send + '_;

  /// Persist one bulk-imported bookmark.
  ///
  /// Shares `add`'s validation, uniqueness rules and id assignment, but
  /// preserves the caller's timestamps and document verbatim.
  fn import(
    &self,
    record: ImportedBookmark,
  ) -> impl Future<Output = Result<Bookmark>> + Send + '_;
}
