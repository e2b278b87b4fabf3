use anyhow::Context;
use tokio_postgres::{Client, NoTls, Row, Statement};

use crate::api::{Book, BookId};
use crate::books_repository::{BookRepository, BookRepositoryError};

const BOOK_COLUMNS: &str = "id, title, author, price";

pub struct PostgresBooksRepository {
    client: Client,
}

pub struct PostgresBooksRepositoryConfig {
    pub hostname: String,
    pub username: String,
    pub password: String,
}

impl PostgresBooksRepository {
    pub async fn init(config: PostgresBooksRepositoryConfig) -> anyhow::Result<Self> {
        let connection_str = format!(
            "postgresql://{}:{}@{}",
            config.username, config.password, config.hostname
        );
        tracing::info!(
            "Connecting to postgres at {} as {}",
            config.hostname,
            config.username
        );
        let (client, connection) = tokio_postgres::connect(&connection_str, NoTls)
            .await
            .context("Failed to start postgres")?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("Postgres connection error: {}", e);
            }
        });

        client
            .batch_execute(
                "
        CREATE SCHEMA IF NOT EXISTS library;
        CREATE TABLE IF NOT EXISTS library.book (
            id              BIGSERIAL PRIMARY KEY,
            title           TEXT NOT NULL,
            author          TEXT NOT NULL,
            price           DOUBLE PRECISION NOT NULL
            )
        ",
            )
            .await
            .context("Failed to setup table")?;
        Ok(Self { client })
    }
}

fn book_from_row(row: &Row) -> Result<Book, BookRepositoryError> {
    Ok(Book {
        id: Some(row.try_get(0)?),
        title: row.try_get(1)?,
        author: row.try_get(2)?,
        price: row.try_get(3)?,
    })
}

#[async_trait::async_trait]
impl BookRepository for PostgresBooksRepository {
    async fn find_all(&self) -> Result<Vec<Book>, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!(
                "SELECT {BOOK_COLUMNS} FROM library.book ORDER BY id"
            ))
            .await?;

        let rows = self.client.query(&stmt, &[]).await?;

        rows.iter().map(book_from_row).collect()
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!(
                "SELECT {BOOK_COLUMNS} FROM library.book WHERE id = ($1)"
            ))
            .await?;

        let rows = self.client.query(&stmt, &[&book_id]).await?;

        rows.first().map(book_from_row).transpose()
    }

    async fn save(&self, book: Book) -> Result<Book, BookRepositoryError> {
        let rows = match book.id {
            None => {
                let stmt: Statement = self
                    .client
                    .prepare(&format!(
                        "INSERT INTO library.book (title, author, price) VALUES ($1, $2, $3) \
                         RETURNING {BOOK_COLUMNS}"
                    ))
                    .await?;
                self.client
                    .query(&stmt, &[&book.title, &book.author, &book.price])
                    .await?
            }
            Some(book_id) => {
                let stmt: Statement = self
                    .client
                    .prepare(&format!(
                        "INSERT INTO library.book (id, title, author, price) VALUES ($1, $2, $3, $4) \
                         ON CONFLICT (id) DO UPDATE \
                         SET title = EXCLUDED.title, author = EXCLUDED.author, price = EXCLUDED.price \
                         RETURNING {BOOK_COLUMNS}"
                    ))
                    .await?;
                self.client
                    .query(
                        &stmt,
                        &[&book_id, &book.title, &book.author, &book.price],
                    )
                    .await?
            }
        };

        book_from_row(
            rows.first()
                .ok_or_else(|| BookRepositoryError::Other("Book not returned".to_string()))?,
        )
    }

    async fn delete_by_id(&self, book_id: BookId) -> Result<(), BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("DELETE FROM library.book WHERE id = ($1)")
            .await?;

        self.client.execute(&stmt, &[&book_id]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod postgres_book_repository_tests {
    use serial_test::file_serial;
    use testcontainers::core::IntoContainerPort;
    use testcontainers::runners::AsyncRunner;
    use testcontainers::{ContainerAsync, GenericImage, ImageExt};

    use crate::api::Book;
    use crate::books_repository::BookRepository;

    async fn start_postgres_container_and_init_repo() -> (
        ContainerAsync<GenericImage>,
        crate::books_repository::PostgresBooksRepository,
    ) {
        let _pg_container = GenericImage::new("postgres", "latest")
            .with_mapped_port(5432, 5432.tcp())
            .with_env_var("POSTGRES_USER", "postgres")
            .with_env_var("POSTGRES_PASSWORD", "postgres")
            .start()
            .await
            .expect("Failed to start postgres");

        for _ in 0..10 {
            if let Ok(repo) = crate::books_repository::PostgresBooksRepository::init(
                crate::books_repository::PostgresBooksRepositoryConfig {
                    hostname: "127.0.0.1".to_string(),
                    username: "postgres".to_string(),
                    password: "postgres".to_string(),
                },
            )
            .await
            {
                return (_pg_container, repo);
            }
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        }
        panic!("Failed to setup postgres container")
    }

    fn book(title: &str, author: &str, price: f64) -> Book {
        Book {
            id: None,
            title: title.to_string(),
            author: author.to_string(),
            price,
        }
    }

    #[tokio::test]
    #[file_serial(key, path => "../.pgtestslock")]
    /// Tests if save and find_by_id work correctly
    /// for the sake of not starting container multiple times it tests everything in one testcase
    async fn test_save_book_and_find_it() {
        let (_container, repo) = start_postgres_container_and_init_repo().await;

        let not_existing_book_id = 20000;
        let book_not_found = repo
            .find_by_id(not_existing_book_id)
            .await
            .expect("Failed to find book");
        assert_eq!(book_not_found, None);

        let saved = repo
            .save(book("xx", "www", 12.5))
            .await
            .expect("Failed to save book");
        let id = saved.id.expect("Id not assigned");
        assert_eq!(saved.title, "xx");
        assert_eq!(saved.author, "www");
        assert_eq!(saved.price, 12.5);

        let found = repo.find_by_id(id).await.expect("Failed to find book");
        assert_eq!(found, Some(saved.clone()));

        let overwritten = repo
            .save(Book {
                title: "patchedTitle".to_string(),
                ..saved.clone()
            })
            .await
            .expect("Failed to overwrite book");
        assert_eq!(overwritten.id, Some(id));
        assert_eq!(
            repo.find_by_id(id).await.expect("Failed to find book"),
            Some(overwritten)
        );
    }

    #[tokio::test]
    #[file_serial(key, path => "../.pgtestslock")]
    /// Tests if find_all returns books in insertion order and delete_by_id removes them
    /// for the sake of not starting container multiple times it tests everything in one testcase
    async fn test_save_books_list_and_delete_them() {
        let (_container, repo) = start_postgres_container_and_init_repo().await;

        let list = repo.find_all().await.expect("Failed to list books");
        assert_eq!(list, vec![]);

        let first = repo
            .save(book("Spring Boot Basics", "John Doe", 25.99))
            .await
            .expect("Failed to save book");
        let second = repo
            .save(book("Advanced Java", "Jane Doe", 30.50))
            .await
            .expect("Failed to save book");

        let list = repo.find_all().await.expect("Failed to list books");
        assert_eq!(list, vec![first.clone(), second.clone()]);

        repo.delete_by_id(20000)
            .await
            .expect("Deleting unknown book should not fail");
        assert_eq!(repo.find_all().await.unwrap().len(), 2);

        repo.delete_by_id(first.id.unwrap())
            .await
            .expect("Failed to delete book");
        assert_eq!(repo.find_by_id(first.id.unwrap()).await.unwrap(), None);
        assert_eq!(repo.find_all().await.unwrap(), vec![second]);
    }
}
