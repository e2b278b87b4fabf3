use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

pub type BookId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
/// Book record as stored in the catalog.
/// `id` is only `None` for a book that has not been saved yet,
/// on input it may be omitted and is ignored by the update endpoint
pub struct Book {
    #[serde(default)]
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
/// Request body used to create a book, the id is always assigned by the catalog
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl From<CreateBook> for Book {
    fn from(request: CreateBook) -> Self {
        Self {
            id: None,
            title: request.title,
            author: request.author,
            price: request.price,
        }
    }
}
