//! JSON REST API for shelf.
//!
//! This crate turns any [`shelf_core::store::BookmarkStore`] into an
//! [`axum`] router. It owns routing, status codes, and the JSON error
//! shape; everything else (listening, middleware, TLS) belongs to the
//! binary that mounts it.
//!
//! The router is plain and state-erased, so embedding it is one line:
//!
//! ```rust,ignore
//! let app = Router::new().nest("/api", shelf_api::api_router(store));
//! ```

pub mod bookmarks;
pub mod error;
pub mod transfer;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use shelf_core::store::BookmarkStore;

pub use self::error::ApiError;

/// Build the API router over `store`.
///
/// All routes answer JSON except `GET /export`, which answers
/// `text/csv`. Errors come back as `{"error": "..."}` with the status
/// picked by [`ApiError`].
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: BookmarkStore + 'static,
{
  Router::new()
    .route(
      "/bookmarks",
      get(bookmarks::list::<S>).post(bookmarks::create::<S>),
    )
    .route("/bookmarks/by-url", get(bookmarks::get_by_url::<S>))
    .route(
      "/bookmarks/{id}",
      get(bookmarks::get_one::<S>)
        .put(bookmarks::update_one::<S>)
        .delete(bookmarks::delete_one::<S>),
    )
    .route("/import", post(transfer::import::<S>))
    .route("/export", get(transfer::export::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use serde_json::{Value, json};
  use shelf_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn make_router() -> Router {
    let store = SqliteStore::open_in_memory()
      .await
      .expect("in-memory store should open");
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
  ) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
      Some(payload) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
  }

  async fn text_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  async fn json_body(response: Response) -> Value {
    serde_json::from_str(&text_body(response).await).unwrap()
  }

  const CREATE_BODY: &str = r#"{
    "title": "test title",
    "url":   "https://test.com",
    "tags":  ["test"],
    "notes": "test Note"
  }"#;

  // ── Create ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_and_the_stored_record() {
    let app = make_router().await;

    let response = send(&app, "POST", "/bookmarks", Some(CREATE_BODY)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "test title");
    assert_eq!(body["url"], "https://test.com");
    assert_eq!(body["tags"], json!(["test"]));
    assert_eq!(body["notes"], "test Note");
    assert_eq!(body["document"], "");
    assert_eq!(body["created_at"], body["updated_at"]);
    assert_eq!(body.as_object().unwrap().len(), 8);
  }

  #[tokio::test]
  async fn create_rejects_blank_fields_naming_every_offender() {
    let app = make_router().await;

    let response =
      send(&app, "POST", "/bookmarks", Some(r#"{"title":"","url":""}"#))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("title"), "missing field name: {message}");
    assert!(message.contains("url"), "missing field name: {message}");
  }

  #[tokio::test]
  async fn create_rejects_duplicate_url() {
    let app = make_router().await;
    send(&app, "POST", "/bookmarks", Some(CREATE_BODY)).await;

    let response = send(
      &app,
      "POST",
      "/bookmarks",
      Some(r#"{"title":"another title","url":"https://test.com"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("https://test.com"), "got: {message}");
  }

  // ── List ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_on_an_empty_store_is_an_empty_array() {
    let app = make_router().await;

    let response = send(&app, "GET", "/bookmarks", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
  }

  #[tokio::test]
  async fn list_returns_summaries_without_body_fields() {
    let app = make_router().await;
    send(&app, "POST", "/bookmarks", Some(CREATE_BODY)).await;
    send(
      &app,
      "POST",
      "/bookmarks",
      Some(r#"{"title":"second","url":"https://second.test"}"#),
    )
    .await;

    let response = send(&app, "GET", "/bookmarks", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[1]["id"], 2);
    assert!(rows[0].get("notes").is_none());
    assert!(rows[0].get("document").is_none());
  }

  // ── Get ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_returns_the_full_record() {
    let app = make_router().await;
    send(&app, "POST", "/bookmarks", Some(CREATE_BODY)).await;

    let response = send(&app, "GET", "/bookmarks/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["title"], "test title");
    assert_eq!(body["notes"], "test Note");
  }

  #[tokio::test]
  async fn get_unknown_id_is_404() {
    let app = make_router().await;

    let response = send(&app, "GET", "/bookmarks/999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("999"));
  }

  #[tokio::test]
  async fn get_by_url_finds_exact_matches_only() {
    let app = make_router().await;
    send(&app, "POST", "/bookmarks", Some(CREATE_BODY)).await;

    let response = send(
      &app,
      "GET",
      "/bookmarks/by-url?url=https://test.com",
      None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], 1);

    let response = send(
      &app,
      "GET",
      "/bookmarks/by-url?url=https://test.com/deeper",
      None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  // ── Update ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn put_replaces_the_record_and_keeps_created_at() {
    let app = make_router().await;
    let created =
      json_body(send(&app, "POST", "/bookmarks", Some(CREATE_BODY)).await)
        .await;

    let mut record = created.clone();
    record["title"] = json!("renamed");
    record["tags"] = json!(["test", "renamed"]);

    let response =
      send(&app, "PUT", "/bookmarks/1", Some(&record.to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "renamed");
    assert_eq!(body["tags"], json!(["test", "renamed"]));
    assert_eq!(body["created_at"], created["created_at"]);
  }

  #[tokio::test]
  async fn put_path_id_wins_over_body_id() {
    let app = make_router().await;
    let created =
      json_body(send(&app, "POST", "/bookmarks", Some(CREATE_BODY)).await)
        .await;

    let mut record = created.clone();
    record["id"] = json!(42);

    let response =
      send(&app, "PUT", "/bookmarks/1", Some(&record.to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], 1);
  }

  #[tokio::test]
  async fn put_unknown_id_is_404() {
    let app = make_router().await;
    let created =
      json_body(send(&app, "POST", "/bookmarks", Some(CREATE_BODY)).await)
        .await;

    let response =
      send(&app, "PUT", "/bookmarks/999", Some(&created.to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  // ── Delete ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_answers_204_then_the_record_is_gone() {
    let app = make_router().await;
    send(&app, "POST", "/bookmarks", Some(CREATE_BODY)).await;

    let response = send(&app, "DELETE", "/bookmarks/1", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/bookmarks/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", "/bookmarks/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  // ── Transfer ──────────────────────────────────────────────────────

  const IMPORT_BODY: &str =
    "title|url|tags|notes|document|created_at|updated_at\n\
     test title|https://test.com|tag|||2020-03-04T18:23:43Z|2020-03-04T18:23:43Z\n\
     second|https://second.test||||2021-01-01T00:00:00Z|2021-01-01T00:00:00Z\n";

  #[tokio::test]
  async fn import_reports_how_many_rows_landed() {
    let app = make_router().await;

    let response = send(&app, "POST", "/import", Some(IMPORT_BODY)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "imported": 2 }));

    let listing = json_body(send(&app, "GET", "/bookmarks", None).await).await;
    assert_eq!(listing.as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn import_failure_keeps_rows_stored_before_the_bad_one() {
    let app = make_router().await;

    let payload = "title|url|tags|notes|document|created_at|updated_at\n\
                   good|https://good.test||||2020-03-04T18:23:43Z|2020-03-04T18:23:43Z\n\
                   |https://blank-title.test||||2020-03-04T18:23:43Z|2020-03-04T18:23:43Z\n";
    let response = send(&app, "POST", "/import", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let listing = json_body(send(&app, "GET", "/bookmarks", None).await).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["title"], "good");
  }

  #[tokio::test]
  async fn export_answers_csv_with_every_record() {
    let app = make_router().await;
    send(&app, "POST", "/bookmarks", Some(CREATE_BODY)).await;

    let response = send(&app, "GET", "/export", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
      .headers()
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .unwrap_or_default()
      .to_owned();
    assert!(content_type.starts_with("text/csv"), "got: {content_type}");

    let text = text_body(response).await;
    let mut lines = text.lines();
    assert_eq!(
      lines.next(),
      Some("title|url|tags|notes|document|created_at|updated_at")
    );
    assert!(text.contains("test title|https://test.com|test|test Note|"));
  }
}
