use crate::domain::error::DomainError;
use crate::domain::models::{Book, BookChanges, NewBook};
use crate::domain::repository::{AuthorRepository, BookRepository};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct BookService<R: BookRepository + AuthorRepository> {
    repository: Arc<R>,
}

fn not_found(id: i64) -> anyhow::Error {
    DomainError::NotFound(format!("Book {} not found", id)).into()
}

impl<R: BookRepository + AuthorRepository> BookService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.repository.list_books().await
    }

    #[instrument(skip(self))]
    pub async fn get_book(&self, id: i64) -> Result<Book> {
        self.repository.find_book(id).await?.ok_or_else(|| not_found(id))
    }

    #[instrument(skip(self, book), fields(title = %book.title))]
    pub async fn create_book(&self, book: NewBook) -> Result<Book> {
        book.validate()?;
        self.ensure_author(book.author_id).await?;
        let book = self.repository.insert_book(book).await?;
        info!(book_id = book.id, "Book created");
        Ok(book)
    }

    #[instrument(skip(self, changes))]
    pub async fn update_book(&self, id: i64, changes: BookChanges) -> Result<Book> {
        changes.validate()?;
        if let Some(author_id) = changes.author_id {
            self.ensure_author(author_id).await?;
        }
        self.repository
            .update_book(id, changes)
            .await?
            .ok_or_else(|| not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: i64) -> Result<Book> {
        let book = self
            .repository
            .delete_book(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(book_id = id, "Book deleted");
        Ok(book)
    }

    async fn ensure_author(&self, author_id: i64) -> Result<()> {
        if self.repository.find_author(author_id).await?.is_none() {
            warn!(author_id, "Book references a missing author");
            return Err(DomainError::NotFound(format!("Author {} not found", author_id)).into());
        }
        Ok(())
    }
}
