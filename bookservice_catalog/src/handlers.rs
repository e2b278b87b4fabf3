use actix_web::web::Data;
use actix_web::Error;
use actix_web::HttpResponse;
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::{Book, BookId, CreateBook};
use crate::book_service::{BookService, BookServiceError};

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

/// Every failure of the service ends up as 500, including a missing book on update
fn internal_error(operation: &str, err: BookServiceError) -> HttpResponse {
    tracing::error!("{} failed {}", operation, err);
    HttpResponse::InternalServerError().json(err.to_string())
}

#[api_v2_operation]
pub async fn get_all_books(book_service: Data<BookService>) -> Result<HttpResponse, Error> {
    Ok(match book_service.list_all().await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(err) => internal_error("Get all books", err),
    })
}

#[api_v2_operation]
pub async fn get_book(
    book_service: Data<BookService>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(match book_service.get_by_id(book_id.into_inner()).await {
        // missing book is answered with 200 and null body
        Ok(book) => HttpResponse::Ok().json(book),
        Err(err) => internal_error("Get book", err),
    })
}

#[api_v2_operation]
pub async fn create_book(
    book_service: Data<BookService>,
    request: web::Json<CreateBook>,
) -> Result<HttpResponse, Error> {
    Ok(match book_service.create(request.into_inner()).await {
        Ok(book) => HttpResponse::Ok().json(book),
        Err(err) => internal_error("Create book", err),
    })
}

#[api_v2_operation]
pub async fn update_book(
    book_service: Data<BookService>,
    book_id: web::Path<BookId>,
    patch: web::Json<Book>,
) -> Result<HttpResponse, Error> {
    Ok(
        match book_service
            .update(book_id.into_inner(), patch.into_inner())
            .await
        {
            Ok(book) => HttpResponse::Ok().json(book),
            Err(err) => internal_error("Update book", err),
        },
    )
}

#[api_v2_operation]
pub async fn delete_book(
    book_service: Data<BookService>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(match book_service.delete(book_id.into_inner()).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(err) => internal_error("Delete book", err),
    })
}
