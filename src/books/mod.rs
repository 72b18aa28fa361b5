//! Books module
//!
//! Data model and storage for book records, backed by SQLite.

pub mod db;
pub mod models;

pub use db::BookDb;
pub use models::{Book, BookPayload};
