//! Handlers for bulk CSV transfer.
//!
//! | Method | Path      | Behaviour                                  |
//! |--------|-----------|--------------------------------------------|
//! | `POST` | `/import` | Ingest CSV text, reply `{"imported": n}`   |
//! | `GET`  | `/export` | The whole store as a `text/csv` document   |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use serde_json::json;
use shelf_core::{csv, store::BookmarkStore};

use crate::error::ApiError;

/// `POST /import`
///
/// The body is raw CSV in the bookmark interchange format. Import is
/// fail-fast: rows stored before the offending one stay stored, and
/// the error message names what went wrong.
pub async fn import<S>(
  State(store): State<Arc<S>>,
  body: String,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: BookmarkStore,
{
  let imported = csv::import_csv(&*store, &body).await?;
  Ok(Json(json!({ "imported": imported })))
}

/// `GET /export`
pub async fn export<S>(
  State(store): State<Arc<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BookmarkStore,
{
  let text = csv::export_csv(&*store).await?;
  Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], text))
}
