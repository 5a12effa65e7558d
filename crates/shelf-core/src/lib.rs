//! Domain types and trait contracts for the Shelf bookmark manager.
//!
//! Everything here is storage- and transport-agnostic: the record
//! types, the validation rules, the store trait, the error enum, and
//! the CSV text format. The backend, API, and CLI crates all build on
//! this one.

pub mod bookmark;
pub mod csv;
pub mod error;
pub mod store;

pub use error::{Error, Result};
