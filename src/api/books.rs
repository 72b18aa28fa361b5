//! Book API endpoints
//!
//! Contains HTTP request handlers for book CRUD operations. Every
//! response nests the serialized record(s) under an envelope key
//! (`books`, `book`, `deleted_book`).

use crate::books::{Book, BookDb, BookPayload};
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Book response type
///
/// Exposes exactly the four contract fields, with the timestamp rendered
/// as an RFC 3339 string.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    /// Unique identifier for the book
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// When the book was added, RFC 3339
    pub date_added: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            date_added: book.date_added.to_rfc3339(),
        }
    }
}

/// Book list response, enveloped under `books`
#[derive(Debug, Serialize)]
pub struct BooksListResponse {
    /// All stored books, in store-native order
    pub books: Vec<BookResponse>,
}

/// Single book response, enveloped under `book`
#[derive(Debug, Serialize)]
pub struct BookEnvelope {
    /// The requested or persisted book
    pub book: BookResponse,
}

/// Deleted book response, enveloped under `deleted_book`
#[derive(Debug, Serialize)]
pub struct DeletedBookEnvelope {
    /// State of the book before removal
    pub deleted_book: BookResponse,
}

/// GET /books - List all books
pub async fn list_books(
    State(db): State<Arc<BookDb>>,
) -> Result<Json<BooksListResponse>, AppError> {
    let books = db.list_books().await?;

    Ok(Json(BooksListResponse {
        books: books.into_iter().map(BookResponse::from).collect(),
    }))
}

/// POST /books - Create a new book
pub async fn create_book(
    State(db): State<Arc<BookDb>>,
    Json(payload): Json<BookPayload>,
) -> Result<(StatusCode, Json<BookEnvelope>), AppError> {
    let (title, author) = payload.validate().map_err(AppError::Validation)?;

    let book = db.create_book(&title, &author).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookEnvelope { book: book.into() }),
    ))
}

/// GET /book/:id - Get a book by its id
pub async fn get_book(
    State(db): State<Arc<BookDb>>,
    Path(id): Path<i64>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = db.get_book(id).await?.ok_or(AppError::BookNotFound(id))?;

    Ok(Json(BookEnvelope { book: book.into() }))
}

/// PUT /book/:id - Update a book's title and author
pub async fn update_book(
    State(db): State<Arc<BookDb>>,
    Path(id): Path<i64>,
    Json(payload): Json<BookPayload>,
) -> Result<Json<BookEnvelope>, AppError> {
    let (title, author) = payload.validate().map_err(AppError::Validation)?;

    let book = db
        .update_book(id, &title, &author)
        .await?
        .ok_or(AppError::BookNotFound(id))?;

    Ok(Json(BookEnvelope { book: book.into() }))
}

/// DELETE /book/:id - Delete a book
pub async fn delete_book(
    State(db): State<Arc<BookDb>>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedBookEnvelope>, AppError> {
    let book = db
        .delete_book(id)
        .await?
        .ok_or(AppError::BookNotFound(id))?;

    Ok(Json(DeletedBookEnvelope {
        deleted_book: book.into(),
    }))
}
