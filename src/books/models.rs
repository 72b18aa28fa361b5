//! Book data models
//!
//! Defines the stored row shape and the request payload with its
//! validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum allowed length for a book title, in characters
pub const TITLE_MAX_CHARS: usize = 25;

/// Maximum allowed length for an author name, in characters
pub const AUTHOR_MAX_CHARS: usize = 30;

/// A book record as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Unique identifier, assigned by the store
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// When the record was created (UTC), set once at creation
    pub date_added: DateTime<Utc>,
}

/// Request payload for creating or updating a book
///
/// Fields are optional so absence is caught by [`BookPayload::validate`]
/// rather than by the JSON deserializer, keeping the validation step
/// explicit and ahead of persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct BookPayload {
    /// Title of the book (required, max 25 characters)
    pub title: Option<String>,
    /// Author of the book (required, max 30 characters)
    pub author: Option<String>,
}

impl BookPayload {
    /// Validate the payload, returning the title and author on success
    ///
    /// Rejects absent, blank, or over-length fields. Lengths are measured
    /// in characters, not bytes.
    pub fn validate(&self) -> Result<(String, String), String> {
        let title = require_field(&self.title, "title", TITLE_MAX_CHARS)?;
        let author = require_field(&self.author, "author", AUTHOR_MAX_CHARS)?;
        Ok((title, author))
    }
}

fn require_field(value: &Option<String>, name: &str, max_chars: usize) -> Result<String, String> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Err(format!("{} is required", name)),
    };

    let length = value.chars().count();
    if length > max_chars {
        return Err(format!(
            "{} must be at most {} characters, got {}",
            name, max_chars, length
        ));
    }

    Ok(value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: Option<&str>, author: Option<&str>) -> BookPayload {
        BookPayload {
            title: title.map(String::from),
            author: author.map(String::from),
        }
    }

    #[test]
    fn test_valid_payload() {
        let result = payload(Some("Dune"), Some("Frank Herbert")).validate();
        assert_eq!(
            result.unwrap(),
            ("Dune".to_string(), "Frank Herbert".to_string())
        );
    }

    #[test]
    fn test_missing_title_rejected() {
        let result = payload(None, Some("Frank Herbert")).validate();
        assert_eq!(result.unwrap_err(), "title is required");
    }

    #[test]
    fn test_missing_author_rejected() {
        let result = payload(Some("Dune"), None).validate();
        assert_eq!(result.unwrap_err(), "author is required");
    }

    #[test]
    fn test_blank_title_rejected() {
        let result = payload(Some("   "), Some("Frank Herbert")).validate();
        assert_eq!(result.unwrap_err(), "title is required");
    }

    #[test]
    fn test_title_at_limit_accepted() {
        let title = "a".repeat(TITLE_MAX_CHARS);
        let result = payload(Some(&title), Some("Frank Herbert")).validate();
        assert!(result.is_ok());
    }

    #[test]
    fn test_title_over_limit_rejected() {
        let title = "a".repeat(TITLE_MAX_CHARS + 1);
        let result = payload(Some(&title), Some("Frank Herbert")).validate();
        assert!(result.unwrap_err().starts_with("title must be at most"));
    }

    #[test]
    fn test_author_over_limit_rejected() {
        let author = "a".repeat(AUTHOR_MAX_CHARS + 1);
        let result = payload(Some("Dune"), Some(&author)).validate();
        assert!(result.unwrap_err().starts_with("author must be at most"));
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        // 25 multi-byte characters, well over 25 bytes
        let title = "é".repeat(TITLE_MAX_CHARS);
        let result = payload(Some(&title), Some("Frank Herbert")).validate();
        assert!(result.is_ok());
    }
}
