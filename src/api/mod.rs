//! API module
//!
//! Contains HTTP request handlers for the book endpoints

pub mod books;
