//! SQLite backend for the Shelf bookmark store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. That thread executes operations one at
//! a time, which together with per-operation transactions makes every
//! check-then-write sequence atomic.

mod encode;
mod schema;
mod store;

pub use store::SqliteStore;
