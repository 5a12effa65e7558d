//! Async HTTP client wrapping the shelf JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use shelf_core::bookmark::{
  Bookmark, BookmarkId, BookmarkSummary, NewBookmark,
};

/// Async HTTP client for the shelf JSON REST API.
///
/// Clones share the underlying [`reqwest::Client`] connection pool.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: String) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  /// Turn a non-2xx response into an error, keeping the server's
  /// `{"error": ...}` detail when the body carries one.
  async fn fail(line: &str, resp: Response) -> anyhow::Error {
    let status = resp.status();
    let detail = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v["error"].as_str().map(str::to_string));
    match detail {
      Some(detail) => anyhow!("{line} → {status}: {detail}"),
      None => anyhow!("{line} → {status}"),
    }
  }

  // ── Bookmarks ─────────────────────────────────────────────────────

  /// `GET /api/bookmarks`
  pub async fn list(&self) -> Result<Vec<BookmarkSummary>> {
    let resp = self
      .client
      .get(self.url("/bookmarks"))
      .send()
      .await
      .context("GET /bookmarks failed")?;

    if !resp.status().is_success() {
      return Err(Self::fail("GET /bookmarks", resp).await);
    }
    resp.json().await.context("deserialising bookmarks")
  }

  /// `POST /api/bookmarks`
  pub async fn create(&self, input: &NewBookmark) -> Result<Bookmark> {
    let resp = self
      .client
      .post(self.url("/bookmarks"))
      .json(input)
      .send()
      .await
      .context("POST /bookmarks failed")?;

    if !resp.status().is_success() {
      return Err(Self::fail("POST /bookmarks", resp).await);
    }
    resp.json().await.context("deserialising bookmark")
  }

  /// `GET /api/bookmarks/{id}`
  pub async fn get(&self, id: BookmarkId) -> Result<Bookmark> {
    let resp = self
      .client
      .get(self.url(&format!("/bookmarks/{id}")))
      .send()
      .await
      .context("GET /bookmarks/{id} failed")?;

    if !resp.status().is_success() {
      return Err(Self::fail(&format!("GET /bookmarks/{id}"), resp).await);
    }
    resp.json().await.context("deserialising bookmark")
  }

  /// `GET /api/bookmarks/by-url?url=<url>`
  pub async fn get_by_url(&self, url: &str) -> Result<Bookmark> {
    let resp = self
      .client
      .get(self.url("/bookmarks/by-url"))
      .query(&[("url", url)])
      .send()
      .await
      .context("GET /bookmarks/by-url failed")?;

    if !resp.status().is_success() {
      return Err(Self::fail("GET /bookmarks/by-url", resp).await);
    }
    resp.json().await.context("deserialising bookmark")
  }

  /// `PUT /api/bookmarks/{id}`
  pub async fn update(&self, record: &Bookmark) -> Result<Bookmark> {
    let resp = self
      .client
      .put(self.url(&format!("/bookmarks/{}", record.id)))
      .json(record)
      .send()
      .await
      .context("PUT /bookmarks/{id} failed")?;

    if !resp.status().is_success() {
      return Err(
        Self::fail(&format!("PUT /bookmarks/{}", record.id), resp).await,
      );
    }
    resp.json().await.context("deserialising bookmark")
  }

  /// `DELETE /api/bookmarks/{id}`
  pub async fn delete(&self, id: BookmarkId) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/bookmarks/{id}")))
      .send()
      .await
      .context("DELETE /bookmarks/{id} failed")?;

    if !resp.status().is_success() {
      return Err(Self::fail(&format!("DELETE /bookmarks/{id}"), resp).await);
    }
    Ok(())
  }
}
