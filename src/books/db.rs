//! Book database operations
//!
//! Handles all database interactions for book records.

use crate::books::models::Book;
use crate::error::AppError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// Database connection pool for book operations
///
/// Constructed once at startup and handed to each request handler as
/// shared state, so tests can substitute a throwaway database.
pub struct BookDb {
    pool: SqlitePool,
}

impl BookDb {
    /// Initialize database connection pool
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    ///
    /// # Returns
    /// * `Ok(BookDb)` if successful
    /// * `Err(AppError)` if connection failed
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Ensure parent directory exists
        if let Some(parent) = PathBuf::from(db_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
            })?;
        }

        // SQLite connection string format: sqlite://path/to/db.db
        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!("Connected to SQLite database at: {}", db_path);

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_books.sql");

        // Strip comment lines and inline comments, then split into statements
        let mut cleaned_sql = String::new();
        for line in migration_sql.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            let without_comments = if let Some(comment_pos) = trimmed.find("--") {
                &trimmed[..comment_pos]
            } else {
                trimmed
            };
            cleaned_sql.push_str(without_comments.trim());
            cleaned_sql.push(' ');
        }

        let statements: Vec<&str> = cleaned_sql
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get all books, in store-native (id) order
    pub async fn list_books(&self) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, date_added FROM books ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Get a book by ID
    pub async fn get_book(&self, id: i64) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, date_added FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Insert a new book, with `date_added` defaulted to now (UTC)
    ///
    /// Returns the stored row, including the store-assigned id.
    pub async fn create_book(&self, title: &str, author: &str) -> Result<Book, AppError> {
        let date_added = Utc::now();

        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author, date_added) VALUES (?, ?, ?) \
             RETURNING id, title, author, date_added",
        )
        .bind(title)
        .bind(author)
        .bind(date_added)
        .fetch_one(&self.pool)
        .await?;

        debug!("Created book: {}", book.id);
        Ok(book)
    }

    /// Overwrite title and author of an existing book
    ///
    /// `id` and `date_added` are left untouched. Returns `None` when no row
    /// matches the id.
    pub async fn update_book(
        &self,
        id: i64,
        title: &str,
        author: &str,
    ) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<_, Book>(
            "UPDATE books SET title = ?, author = ? WHERE id = ? \
             RETURNING id, title, author, date_added",
        )
        .bind(title)
        .bind(author)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if book.is_some() {
            debug!("Updated book: {}", id);
        }
        Ok(book)
    }

    /// Remove a book, returning its prior state
    ///
    /// Returns `None` when no row matches the id.
    pub async fn delete_book(&self, id: i64) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<_, Book>(
            "DELETE FROM books WHERE id = ? RETURNING id, title, author, date_added",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if book.is_some() {
            debug!("Deleted book: {}", id);
        }
        Ok(book)
    }

    /// Get the database pool (for advanced operations if needed)
    #[allow(dead_code)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_db() -> (BookDb, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = BookDb::new(db_path.to_str().unwrap())
            .await
            .expect("Failed to create test database");
        (db, temp_dir)
    }

    #[tokio::test]
    async fn test_list_books_empty() {
        let (db, _temp_dir) = create_test_db().await;
        let books = db.list_books().await.unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_create_and_get_book() {
        let (db, _temp_dir) = create_test_db().await;
        let created = db.create_book("Dune", "Frank Herbert").await.unwrap();
        assert!(created.id >= 1);

        let fetched = db.get_book(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Dune");
        assert_eq!(fetched.author, "Frank Herbert");
        assert_eq!(fetched.date_added, created.date_added);
    }

    #[tokio::test]
    async fn test_ids_are_distinct_for_identical_payloads() {
        let (db, _temp_dir) = create_test_db().await;
        let first = db.create_book("Dune", "Frank Herbert").await.unwrap();
        let second = db.create_book("Dune", "Frank Herbert").await.unwrap();
        assert_ne!(first.id, second.id);

        let books = db.list_books().await.unwrap();
        assert_eq!(books.len(), 2);
    }

    #[tokio::test]
    async fn test_update_preserves_id_and_date_added() {
        let (db, _temp_dir) = create_test_db().await;
        let created = db.create_book("Dune", "Frank Herbert").await.unwrap();

        let updated = db
            .update_book(created.id, "Dune Messiah", "Frank Herbert")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.date_added, created.date_added);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let (db, _temp_dir) = create_test_db().await;
        let result = db.update_book(999999, "Title", "Author").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_prior_state() {
        let (db, _temp_dir) = create_test_db().await;
        let created = db.create_book("Dune", "Frank Herbert").await.unwrap();

        let deleted = db.delete_book(created.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, created.id);
        assert_eq!(deleted.title, "Dune");

        assert!(db.get_book(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_none() {
        let (db, _temp_dir) = create_test_db().await;
        let result = db.delete_book(999999).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_order_follows_insertion() {
        let (db, _temp_dir) = create_test_db().await;
        db.create_book("First", "A").await.unwrap();
        db.create_book("Second", "B").await.unwrap();
        db.create_book("Third", "C").await.unwrap();

        let books = db.list_books().await.unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }
}
