pub use in_memory_books_repository::InMemoryBookRepository;
pub use postgres_books_repository::{PostgresBooksRepository, PostgresBooksRepositoryConfig};

use crate::api::{Book, BookId};

mod in_memory_books_repository;
mod postgres_books_repository;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Other error {0}")]
    Other(String),
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// Lists all books in the repository, in the order they were added
    async fn find_all(&self) -> Result<Vec<Book>, BookRepositoryError>;
    /// Retrieves the book with given id, None if there is no such book
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError>;
    /// Stores the book and returns the stored value.
    /// A book without id gets a fresh one assigned, a book with id overwrites the stored record
    async fn save(&self, book: Book) -> Result<Book, BookRepositoryError>;
    /// Removes the book, does nothing if the book is not in the repository
    async fn delete_by_id(&self, book_id: BookId) -> Result<(), BookRepositoryError>;
}
