use crate::domain::models::{
    Author, AuthorChanges, Book, BookChanges, Favorite, FavoriteBook, FavoriteInsert, NewAuthor,
    NewBook,
};
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user unless the email is taken, in which case it fails
    /// with `DomainError::Conflict` and leaves the stored account untouched.
    async fn insert_user(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn list_authors(&self) -> Result<Vec<Author>>;
    async fn insert_author(&self, author: NewAuthor) -> Result<Author>;
    async fn find_author(&self, id: i64) -> Result<Option<Author>>;
    async fn update_author(&self, id: i64, changes: AuthorChanges) -> Result<Option<Author>>;
    async fn delete_author(&self, id: i64) -> Result<Option<Author>>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn list_books(&self) -> Result<Vec<Book>>;
    async fn insert_book(&self, book: NewBook) -> Result<Book>;
    async fn find_book(&self, id: i64) -> Result<Option<Book>>;
    async fn update_book(&self, id: i64, changes: BookChanges) -> Result<Option<Book>>;
    /// Removes the book along with every favorite and library row pointing at it.
    async fn delete_book(&self, id: i64) -> Result<Option<Book>>;
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// The user's favorites joined with their books, ordered by title.
    async fn favorites_for_user(&self, user_id: i64) -> Result<Vec<FavoriteBook>>;
    async fn find_favorite(&self, user_id: i64, book_id: i64) -> Result<Option<Favorite>>;
    /// Book existence, the duplicate check and the insert happen atomically.
    async fn insert_favorite(&self, user_id: i64, book_id: i64) -> Result<FavoriteInsert>;
    async fn delete_favorite(&self, user_id: i64, book_id: i64) -> Result<Option<Favorite>>;
}

#[async_trait]
pub trait LibraryRepository: Send + Sync {
    async fn library_for_user(&self, user_id: i64) -> Result<Vec<Book>>;
    async fn find_library_book(&self, user_id: i64, book_id: i64) -> Result<Option<Book>>;
    /// Returns `None` when the book does not exist. Repeated calls keep one row.
    async fn insert_membership(&self, user_id: i64, book_id: i64) -> Result<Option<Book>>;
    /// Returns whether a row was removed.
    async fn delete_membership(&self, user_id: i64, book_id: i64) -> Result<bool>;
}
