//! Handlers for the `/bookmarks` routes.
//!
//! | Method   | Path                | Behaviour                            |
//! |----------|---------------------|--------------------------------------|
//! | `GET`    | `/bookmarks`        | List summaries in insertion order    |
//! | `POST`   | `/bookmarks`        | Create from a [`NewBookmark`], `201` |
//! | `GET`    | `/bookmarks/by-url` | Exact lookup via `?url=`             |
//! | `GET`    | `/bookmarks/{id}`   | Fetch one full record                |
//! | `PUT`    | `/bookmarks/{id}`   | Replace one full record              |
//! | `DELETE` | `/bookmarks/{id}`   | Remove, `204` on success             |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use shelf_core::{
  bookmark::{Bookmark, BookmarkId, BookmarkSummary, NewBookmark},
  store::BookmarkStore,
};

use crate::error::ApiError;

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /bookmarks`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<BookmarkSummary>>, ApiError>
where
  S: BookmarkStore,
{
  let summaries = store.list().await?;
  Ok(Json(summaries))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /bookmarks`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(input): Json<NewBookmark>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BookmarkStore,
{
  let bookmark = store.add(input).await?;
  Ok((StatusCode::CREATED, Json(bookmark)))
}

// ─── Lookup by URL ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ByUrlParams {
  pub url: String,
}

/// `GET /bookmarks/by-url?url=...`
///
/// The match is exact, byte for byte. Sits on its own path segment so
/// it can never shadow `/bookmarks/{id}`.
pub async fn get_by_url<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ByUrlParams>,
) -> Result<Json<Bookmark>, ApiError>
where
  S: BookmarkStore,
{
  let bookmark = store.get_by_url(&params.url).await?;
  Ok(Json(bookmark))
}

// ─── Get ─────────────────────────────────────────────────────────────────────

/// `GET /bookmarks/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<BookmarkId>,
) -> Result<Json<Bookmark>, ApiError>
where
  S: BookmarkStore,
{
  let bookmark = store.get(id).await?;
  Ok(Json(bookmark))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /bookmarks/{id}`
///
/// Takes a full record. The id in the path wins over the id in the
/// body, so a fetch-edit-put round trip needs no bookkeeping on the
/// client side. Timestamps in the body are ignored; the store keeps
/// `created_at` and stamps a fresh `updated_at`.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<BookmarkId>,
  Json(mut record): Json<Bookmark>,
) -> Result<Json<Bookmark>, ApiError>
where
  S: BookmarkStore,
{
  record.id = id;
  let bookmark = store.update(record).await?;
  Ok(Json(bookmark))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /bookmarks/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<BookmarkId>,
) -> Result<StatusCode, ApiError>
where
  S: BookmarkStore,
{
  store.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
