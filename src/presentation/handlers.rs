use crate::application::author_service::AuthorService;
use crate::application::book_service::BookService;
use crate::application::favorite_service::FavoriteService;
use crate::application::library_service::LibraryService;
use crate::application::user_service::UserService;
use crate::data::memory::InMemoryCatalog;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::models::{AuthorChanges, BookChanges, NewAuthor, NewBook, RawId};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::future::{Ready, ready};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub struct AppState {
    pub users: UserService<InMemoryUserRepository>,
    pub authors: AuthorService<InMemoryCatalog>,
    pub books: BookService<InMemoryCatalog>,
    pub favorites: FavoriteService<InMemoryCatalog>,
    pub library: LibraryService<InMemoryCatalog>,
}

impl AppState {
    pub fn new(
        users: Arc<InMemoryUserRepository>,
        catalog: Arc<InMemoryCatalog>,
        jwt_secret: String,
        session_ttl_secs: u64,
    ) -> Self {
        Self {
            users: UserService::new(users, jwt_secret, session_ttl_secs),
            authors: AuthorService::new(catalog.clone()),
            books: BookService::new(catalog.clone()),
            favorites: FavoriteService::new(catalog.clone()),
            library: LibraryService::new(catalog),
        }
    }
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let (error_msg, details) = match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Conflict(msg) => {
                warn!(error = %self, status = %status, "Request rejected");
                (self.to_string(), serde_json::json!({ "message": msg }))
            }
            ApiError::InvalidCredentials => {
                warn!(status = %status, "Invalid credentials");
                (
                    self.to_string(),
                    serde_json::json!({ "message": self.to_string() }),
                )
            }
            // Detail stays in the log
            ApiError::Internal(_) => {
                error!(error = %self, status = %status, "Internal error");
                (
                    "Internal server error".to_string(),
                    serde_json::json!({}),
                )
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_msg,
            details,
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::Conflict(msg)) => ApiError::Conflict(msg.clone()),
            Some(DomainError::InvalidCredentials) => ApiError::InvalidCredentials,
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Internal(format!("{:#}", err)),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::from(anyhow::Error::from(err))
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().copied();
        ready(user.ok_or_else(|| {
            ApiError::from(DomainError::Unauthorized("User not authenticated".to_string()))
        }))
    }
}

/// Path segments are validated, never coerced.
pub(crate) fn path_id(field: &str, raw: String) -> Result<i64, ApiError> {
    Ok(RawId::Text(raw).parse(field)?)
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[instrument(skip(state))]
pub async fn list_authors(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let authors = state.authors.list_authors().await?;
    info!(count = authors.len(), "Authors listed");
    Ok(HttpResponse::Ok().json(authors))
}

#[instrument(skip(state, req))]
pub async fn create_author(
    state: web::Data<AppState>,
    req: web::Json<NewAuthor>,
) -> Result<HttpResponse, ApiError> {
    let author = state.authors.create_author(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(author))
}

#[instrument(skip(state), fields(author_id = %path.as_str()))]
pub async fn get_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path_id("id", path.into_inner())?;
    let author = state.authors.get_author(id).await?;
    Ok(HttpResponse::Ok().json(author))
}

#[instrument(skip(state, req), fields(author_id = %path.as_str()))]
pub async fn update_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<AuthorChanges>,
) -> Result<HttpResponse, ApiError> {
    let id = path_id("id", path.into_inner())?;
    let author = state.authors.update_author(id, req.into_inner()).await?;
    info!(author_id = id, "Author updated");
    Ok(HttpResponse::Ok().json(author))
}

#[instrument(skip(state), fields(author_id = %path.as_str()))]
pub async fn delete_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path_id("id", path.into_inner())?;
    let author = state.authors.delete_author(id).await?;
    Ok(HttpResponse::Ok().json(author))
}

#[instrument(skip(state))]
pub async fn list_books(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let books = state.books.list_books().await?;
    Ok(HttpResponse::Ok().json(books))
}

#[instrument(skip(state, req))]
pub async fn create_book(
    state: web::Data<AppState>,
    req: web::Json<NewBook>,
) -> Result<HttpResponse, ApiError> {
    let book = state.books.create_book(req.into_inner()).await.map_err(|e| {
        error!(error = %e, "Failed to create book");
        e
    })?;
    Ok(HttpResponse::Ok().json(book))
}

#[instrument(skip(state), fields(book_id = %path.as_str()))]
pub async fn get_book(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path_id("id", path.into_inner())?;
    let book = state.books.get_book(id).await?;
    Ok(HttpResponse::Ok().json(book))
}

#[instrument(skip(state, req), fields(book_id = %path.as_str()))]
pub async fn update_book(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<BookChanges>,
) -> Result<HttpResponse, ApiError> {
    let id = path_id("id", path.into_inner())?;
    let book = state.books.update_book(id, req.into_inner()).await?;
    info!(book_id = id, "Book updated");
    Ok(HttpResponse::Ok().json(book))
}

#[instrument(skip(state), fields(book_id = %path.as_str()))]
pub async fn delete_book(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path_id("id", path.into_inner())?;
    let book = state.books.delete_book(id).await?;
    Ok(HttpResponse::Ok().json(book))
}
