use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::api::{Book, BookId};
use crate::books_repository::{BookRepository, BookRepositoryError};

pub struct InMemoryBookRepository {
    book_sequence_generator: AtomicI64,
    books: parking_lot::RwLock<BTreeMap<BookId, Book>>,
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self {
            // ids start from 1 like a database sequence would
            book_sequence_generator: AtomicI64::new(1),
            books: Default::default(),
        }
    }
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(self.books.read().values().cloned().collect())
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        Ok(self.books.read().get(&book_id).cloned())
    }

    async fn save(&self, mut book: Book) -> Result<Book, BookRepositoryError> {
        let mut locked_books = self.books.write();
        let id = match book.id {
            Some(id) => {
                self.book_sequence_generator
                    .fetch_max(id.saturating_add(1), Ordering::Relaxed);
                id
            }
            None => self.book_sequence_generator.fetch_add(1, Ordering::Relaxed),
        };
        book.id = Some(id);
        locked_books.insert(id, book.clone());
        Ok(book)
    }

    async fn delete_by_id(&self, book_id: BookId) -> Result<(), BookRepositoryError> {
        self.books.write().remove(&book_id);
        Ok(())
    }
}
