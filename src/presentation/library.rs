use crate::presentation::handlers::{ApiError, AppState, path_id};
use actix_web::{HttpResponse, web};
use tracing::{debug, instrument};

fn user_book_ids(path: web::Path<(String, String)>) -> Result<(i64, i64), ApiError> {
    let (user_id, book_id) = path.into_inner();
    Ok((path_id("userId", user_id)?, path_id("bookId", book_id)?))
}

#[instrument(skip(state))]
pub async fn list_library(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path_id("id", path.into_inner())?;
    let books = state.library.list_library(user_id).await?;
    Ok(HttpResponse::Ok().json(books))
}

/// A book outside the library is a bare 404: no error body.
#[instrument(skip(state))]
pub async fn get_library_book(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, book_id) = user_book_ids(path)?;
    match state.library.get_library_book(user_id, book_id).await? {
        Some(book) => Ok(HttpResponse::Ok().json(book)),
        None => {
            debug!(user_id, book_id, "Book not in library");
            Ok(HttpResponse::NotFound().finish())
        }
    }
}

#[instrument(skip(state))]
pub async fn add_to_library(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, book_id) = user_book_ids(path)?;
    let book = state.library.add_to_library(user_id, book_id).await?;
    Ok(HttpResponse::Ok().json(book))
}

#[instrument(skip(state))]
pub async fn remove_from_library(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, book_id) = user_book_ids(path)?;
    let message = state.library.remove_from_library(user_id, book_id).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(message))
}
