use crate::domain::models::{
    Author, AuthorChanges, Book, BookChanges, Favorite, LibraryMembership, NewAuthor, NewBook,
};
use crate::domain::repository::{AuthorRepository, BookRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// Monotonic id generator for one table. Ids start at 1 and are never reused.
#[derive(Default)]
pub(super) struct Sequence(i64);

impl Sequence {
    pub(super) fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Default)]
pub(super) struct CatalogTables {
    pub(super) authors: BTreeMap<i64, Author>,
    pub(super) books: BTreeMap<i64, Book>,
    pub(super) favorites: BTreeMap<i64, Favorite>,
    pub(super) library: BTreeMap<i64, LibraryMembership>,
    pub(super) author_ids: Sequence,
    pub(super) book_ids: Sequence,
    pub(super) favorite_ids: Sequence,
    pub(super) library_ids: Sequence,
}

/// Authors, books and the two user-book relations, held behind one lock so
/// joins and conditional writes see a consistent snapshot.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    pub(super) storage: Arc<RwLock<CatalogTables>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorRepository for InMemoryCatalog {
    async fn list_authors(&self) -> Result<Vec<Author>> {
        let storage = self.storage.read().await;
        Ok(storage.authors.values().cloned().collect())
    }

    #[instrument(skip(self, author))]
    async fn insert_author(&self, author: NewAuthor) -> Result<Author> {
        let mut storage = self.storage.write().await;
        let author = Author {
            id: storage.author_ids.next(),
            first_name: author.first_name,
            last_name: author.last_name,
            biography: author.biography,
            portrait_url: author.portrait_url,
        };
        storage.authors.insert(author.id, author.clone());
        debug!(author_id = author.id, "Author saved to memory storage");
        Ok(author)
    }

    async fn find_author(&self, id: i64) -> Result<Option<Author>> {
        let storage = self.storage.read().await;
        Ok(storage.authors.get(&id).cloned())
    }

    #[instrument(skip(self, changes))]
    async fn update_author(&self, id: i64, changes: AuthorChanges) -> Result<Option<Author>> {
        let mut storage = self.storage.write().await;
        let Some(author) = storage.authors.get_mut(&id) else {
            trace!(author_id = id, "Author not found in storage");
            return Ok(None);
        };
        changes.apply(author);
        Ok(Some(author.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_author(&self, id: i64) -> Result<Option<Author>> {
        let mut storage = self.storage.write().await;
        Ok(storage.authors.remove(&id))
    }
}

#[async_trait]
impl BookRepository for InMemoryCatalog {
    async fn list_books(&self) -> Result<Vec<Book>> {
        let storage = self.storage.read().await;
        let mut books: Vec<Book> = storage.books.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    #[instrument(skip(self, book), fields(title = %book.title))]
    async fn insert_book(&self, book: NewBook) -> Result<Book> {
        let mut storage = self.storage.write().await;
        let book = Book {
            id: storage.book_ids.next(),
            title: book.title,
            genre: book.genre,
            description: book.description,
            cover_url: book.cover_url,
            author_id: book.author_id,
        };
        storage.books.insert(book.id, book.clone());
        debug!(book_id = book.id, "Book saved to memory storage");
        Ok(book)
    }

    async fn find_book(&self, id: i64) -> Result<Option<Book>> {
        let storage = self.storage.read().await;
        Ok(storage.books.get(&id).cloned())
    }

    #[instrument(skip(self, changes))]
    async fn update_book(&self, id: i64, changes: BookChanges) -> Result<Option<Book>> {
        let mut storage = self.storage.write().await;
        let Some(book) = storage.books.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(book);
        Ok(Some(book.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_book(&self, id: i64) -> Result<Option<Book>> {
        let mut storage = self.storage.write().await;
        let removed = storage.books.remove(&id);
        if removed.is_some() {
            storage.favorites.retain(|_, f| f.book_id != id);
            storage.library.retain(|_, m| m.book_id != id);
            debug!(book_id = id, "Book and its relations removed");
        }
        Ok(removed)
    }
}
