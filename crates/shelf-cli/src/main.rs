//! `shelf` — personal bookmark manager.
//!
//! One binary, two roles: `shelf serve` hosts the JSON API over a
//! local SQLite store, and the remaining subcommands are a thin HTTP
//! client for it. `import` and `export` open the store directly so
//! bulk transfers work without a running server.
//!
//! # Usage
//!
//! ```
//! shelf serve
//! shelf add https://example.com --title "Example" --tags "read;later"
//! shelf get 3
//! shelf get https://example.com
//! shelf list --fields "id;title;url"
//! shelf import bookmarks.csv
//! shelf export backup.csv
//! ```

mod client;
mod render;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::{Context as _, Result};
use axum::{Router, http::HeaderName};
use clap::{Parser, Subcommand};
use client::ApiClient;
use serde::Deserialize;
use shelf_core::{
  bookmark::{BookmarkId, NewBookmark},
  csv,
};
use shelf_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::{
  request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
  trace::TraceLayer,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "shelf", version, about = "Personal bookmark manager")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "shelf.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Run the HTTP server.
  Serve,

  /// Bookmark a URL.
  Add {
    /// The URL to bookmark.
    url: String,

    /// Title for the bookmark.
    #[arg(long)]
    title: String,

    /// Semicolon-separated tags.
    #[arg(long, default_value = "")]
    tags: String,

    /// Free-form note.
    #[arg(long, default_value = "")]
    note: String,
  },

  /// Show one bookmark.
  Get {
    /// A numeric id, or a URL to look up exactly.
    target: String,
  },

  /// Change fields of a stored bookmark.
  Update {
    id: BookmarkId,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    url: Option<String>,

    /// Semicolon-separated tags; replaces the stored set.
    #[arg(long)]
    tags: Option<String>,

    #[arg(long)]
    note: Option<String>,
  },

  /// Remove a bookmark.
  Delete { id: BookmarkId },

  /// List all bookmarks, one per line.
  List {
    /// Semicolon-separated columns to print.
    #[arg(long, default_value = render::DEFAULT_FIELDS)]
    fields: String,
  },

  /// Load bookmarks from a CSV file straight into the store.
  Import { file: PathBuf },

  /// Write the whole store as CSV to a file, or stdout.
  Export { file: Option<PathBuf> },
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, layered from built-in defaults, the config
/// file, and `SHELF_*` environment variables.
#[derive(Deserialize, Clone)]
struct Settings {
  host:       String,
  port:       u16,
  base_url:   String,
  store_path: PathBuf,
}

fn load_settings(path: &Path) -> Result<Settings> {
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("base_url", "http://127.0.0.1:8080")?
    .set_default("store_path", "shelf.db")?
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("SHELF"))
    .build()
    .context("failed to read configuration")?;

  settings
    .try_deserialize()
    .context("failed to deserialise Settings")
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let settings = load_settings(&cli.config)?;

  match cli.command {
    Command::Serve => serve(settings).await,

    Command::Add { url, title, tags, note } => {
      let client = ApiClient::new(settings.base_url)?;
      let bookmark = client
        .create(&NewBookmark {
          title,
          url,
          tags: csv::split_tags(&tags),
          notes: note,
        })
        .await?;
      render::print_bookmark(&bookmark);
      Ok(())
    }

    Command::Get { target } => {
      let client = ApiClient::new(settings.base_url)?;
      let bookmark = match target.parse::<BookmarkId>() {
        Ok(id) => client.get(id).await?,
        Err(_) => client.get_by_url(&target).await?,
      };
      render::print_bookmark(&bookmark);
      Ok(())
    }

    Command::Update { id, title, url, tags, note } => {
      let client = ApiClient::new(settings.base_url)?;

      // Fetch, overlay the given flags, and put the whole record back.
      // Untouched fields (including the cached document) ride along.
      let mut record = client.get(id).await?;
      if let Some(title) = title {
        record.title = title;
      }
      if let Some(url) = url {
        record.url = url;
      }
      if let Some(tags) = tags {
        record.tags = csv::split_tags(&tags);
      }
      if let Some(note) = note {
        record.notes = note;
      }

      let updated = client.update(&record).await?;
      render::print_bookmark(&updated);
      Ok(())
    }

    Command::Delete { id } => {
      let client = ApiClient::new(settings.base_url)?;
      client.delete(id).await?;
      println!("Deleted bookmark {id}");
      Ok(())
    }

    Command::List { fields } => {
      let client = ApiClient::new(settings.base_url)?;
      let summaries = client.list().await?;
      render::print_summaries(&summaries, &fields)
    }

    Command::Import { file } => {
      let text = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      let store = open_store(&settings).await?;
      let imported = csv::import_csv(&store, &text).await?;
      println!("Imported {imported} bookmarks");
      Ok(())
    }

    Command::Export { file } => {
      let store = open_store(&settings).await?;
      let text = csv::export_csv(&store).await?;
      match file {
        Some(path) => {
          std::fs::write(&path, &text)
            .with_context(|| format!("writing {}", path.display()))?;
          println!("Exported to {}", path.display());
        }
        None => print!("{text}"),
      }
      Ok(())
    }
  }
}

// ─── Server ──────────────────────────────────────────────────────────────────

async fn serve(settings: Settings) -> Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let store = open_store(&settings).await?;

  // Request ids are set before tracing spans open and propagated back
  // on responses.
  let request_id_header = HeaderName::from_static("x-request-id");
  let app = Router::new()
    .nest("/api", shelf_api::api_router(Arc::new(store)))
    .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
    .layer(TraceLayer::new_for_http())
    .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid));

  let address = format!("{}:{}", settings.host, settings.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn open_store(settings: &Settings) -> Result<SqliteStore> {
  SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", settings.store_path)
    })
}
