use std::sync::Arc;

use crate::api::{Book, BookId, CreateBook};
use crate::books_repository::{BookRepository, BookRepositoryError};

#[derive(thiserror::Error, Debug)]
pub enum BookServiceError {
    #[error("Book not found")]
    NotFound(BookId),

    #[error(transparent)]
    Repository(#[from] BookRepositoryError),
}

/// Business rules of the catalog, all state lives in the repository
#[derive(Clone)]
pub struct BookService {
    books_repository: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(books_repository: Arc<dyn BookRepository>) -> Self {
        Self { books_repository }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Book>, BookServiceError> {
        Ok(self.books_repository.find_all().await?)
    }

    /// Missing book is not an error here, None is returned instead
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>, BookServiceError> {
        Ok(self.books_repository.find_by_id(book_id).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, request: CreateBook) -> Result<Book, BookServiceError> {
        Ok(self.books_repository.save(Book::from(request)).await?)
    }

    /// Overwrites title, author and price of the stored book.
    /// Id of the patch is ignored, unlike get_by_id a missing book is reported as NotFound
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, book_id: BookId, patch: Book) -> Result<Book, BookServiceError> {
        let mut book = self
            .books_repository
            .find_by_id(book_id)
            .await?
            .ok_or(BookServiceError::NotFound(book_id))?;

        book.title = patch.title;
        book.author = patch.author;
        book.price = patch.price;

        Ok(self.books_repository.save(book).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, book_id: BookId) -> Result<(), BookServiceError> {
        Ok(self.books_repository.delete_by_id(book_id).await?)
    }
}
