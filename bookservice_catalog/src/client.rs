use anyhow::{bail, Context};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{
    default_on_request_failure, RetryTransientMiddleware, Retryable, RetryableStrategy,
};
use reqwest_tracing::TracingMiddleware;

use crate::api::{Book, BookId, CreateBook};

const MAX_RETRIES: u32 = 3;

/// Retries only requests that failed to reach the server.
/// Status codes are never retried, the catalog answers an update of a missing book with 500
struct RetryOnRequestFailure;

impl RetryableStrategy for RetryOnRequestFailure {
    fn handle(
        &self,
        res: &Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(_) => None,
            Err(error) => default_on_request_failure(error),
        }
    }
}

pub struct BookServiceCatalogClient {
    url: String,
    client: ClientWithMiddleware,
}

impl BookServiceCatalogClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES);
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                RetryOnRequestFailure,
            ))
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Calls GET /health endpoint
    pub async fn health(&self) -> anyhow::Result<()> {
        let response = self
            .client
            .get(format!("{}/health", self.url))
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("Health check failed with status {}", response.status())
        }
        Ok(())
    }

    /// Calls GET /books endpoint
    pub async fn list_books(&self) -> anyhow::Result<Vec<Book>> {
        let response = self
            .client
            .get(format!("{}/books", self.url))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to list books {}", error)
        }
    }

    /// Calls GET /books/{book_id} endpoint
    /// Returns None if the book is not in the catalog
    pub async fn get_book(&self, book_id: BookId) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .get(format!("{}/books/{}", self.url, book_id))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to get book {}", error)
        }
    }

    /// Calls POST /books endpoint
    /// Returns the created book with its assigned id
    pub async fn create_book(&self, request: CreateBook) -> anyhow::Result<Book> {
        let response = self
            .client
            .post(format!("{}/books", self.url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to create book {}", error)
        }

        response
            .json()
            .await
            .context("Failed to parse created book")
    }

    /// Calls PUT /books/{book_id} endpoint
    /// The server answers a missing book with an error, which is returned here as well
    pub async fn update_book(&self, book_id: BookId, book: Book) -> anyhow::Result<Book> {
        let response = self
            .client
            .put(format!("{}/books/{}", self.url, book_id))
            .json(&book)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to update book {}", error)
        }

        response
            .json()
            .await
            .context("Failed to parse updated book")
    }

    /// Calls DELETE /books/{book_id} endpoint
    pub async fn delete_book(&self, book_id: BookId) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(format!("{}/books/{}", self.url, book_id))
            .send()
            .await?;

        if !response.status().is_success() {
            let error: String = response.json().await.unwrap_or_default();
            bail!("Failed to delete book {}", error)
        }
        Ok(())
    }
}
