use crate::domain::error::DomainError;
use crate::domain::models::Book;
use crate::domain::repository::LibraryRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const REMOVED_FROM_LIBRARY: &str = "Deleted book from your library.";

pub struct LibraryService<R: LibraryRepository> {
    repository: Arc<R>,
}

impl<R: LibraryRepository> LibraryService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_library(&self, user_id: i64) -> Result<Vec<Book>> {
        self.repository.library_for_user(user_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_library_book(&self, user_id: i64, book_id: i64) -> Result<Option<Book>> {
        self.repository.find_library_book(user_id, book_id).await
    }

    #[instrument(skip(self))]
    pub async fn add_to_library(&self, user_id: i64, book_id: i64) -> Result<Book> {
        let book = self
            .repository
            .insert_membership(user_id, book_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Book {} not found", book_id)))?;
        info!(book_id, "Book added to library");
        Ok(book)
    }

    /// Succeeds whether or not the book was in the library.
    #[instrument(skip(self))]
    pub async fn remove_from_library(&self, user_id: i64, book_id: i64) -> Result<&'static str> {
        let removed = self.repository.delete_membership(user_id, book_id).await?;
        debug!(removed, "Library membership delete finished");
        Ok(REMOVED_FROM_LIBRARY)
    }
}
