use crate::data::memory::InMemoryCatalog;
use crate::domain::models::{Book, Favorite, FavoriteBook, FavoriteInsert, LibraryMembership};
use crate::domain::repository::{FavoriteRepository, LibraryRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument, trace};

#[async_trait]
impl FavoriteRepository for InMemoryCatalog {
    #[instrument(skip(self))]
    async fn favorites_for_user(&self, user_id: i64) -> Result<Vec<FavoriteBook>> {
        let storage = self.storage.read().await;
        let mut rows: Vec<FavoriteBook> = storage
            .favorites
            .values()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| storage.books.get(&f.book_id).map(|b| FavoriteBook::join(f, b)))
            .collect();
        rows.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        trace!(user_id, count = rows.len(), "Favorites joined with books");
        Ok(rows)
    }

    async fn find_favorite(&self, user_id: i64, book_id: i64) -> Result<Option<Favorite>> {
        let storage = self.storage.read().await;
        Ok(storage
            .favorites
            .values()
            .find(|f| f.user_id == user_id && f.book_id == book_id)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn insert_favorite(&self, user_id: i64, book_id: i64) -> Result<FavoriteInsert> {
        let mut storage = self.storage.write().await;
        if !storage.books.contains_key(&book_id) {
            return Ok(FavoriteInsert::BookMissing);
        }
        if let Some(existing) = storage
            .favorites
            .values()
            .find(|f| f.user_id == user_id && f.book_id == book_id)
        {
            trace!(favorite_id = existing.id, "Favorite already present");
            return Ok(FavoriteInsert::Existing(existing.clone()));
        }
        let favorite = Favorite {
            id: storage.favorite_ids.next(),
            book_id,
            user_id,
            created_at: Utc::now(),
        };
        storage.favorites.insert(favorite.id, favorite.clone());
        debug!(favorite_id = favorite.id, "Favorite saved to memory storage");
        Ok(FavoriteInsert::Created(favorite))
    }

    #[instrument(skip(self))]
    async fn delete_favorite(&self, user_id: i64, book_id: i64) -> Result<Option<Favorite>> {
        let mut storage = self.storage.write().await;
        let id = storage
            .favorites
            .values()
            .find(|f| f.user_id == user_id && f.book_id == book_id)
            .map(|f| f.id);
        Ok(id.and_then(|id| storage.favorites.remove(&id)))
    }
}

#[async_trait]
impl LibraryRepository for InMemoryCatalog {
    #[instrument(skip(self))]
    async fn library_for_user(&self, user_id: i64) -> Result<Vec<Book>> {
        let storage = self.storage.read().await;
        Ok(storage
            .library
            .values()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| storage.books.get(&m.book_id).cloned())
            .collect())
    }

    async fn find_library_book(&self, user_id: i64, book_id: i64) -> Result<Option<Book>> {
        let storage = self.storage.read().await;
        let member = storage
            .library
            .values()
            .any(|m| m.user_id == user_id && m.book_id == book_id);
        Ok(member.then(|| storage.books.get(&book_id).cloned()).flatten())
    }

    #[instrument(skip(self))]
    async fn insert_membership(&self, user_id: i64, book_id: i64) -> Result<Option<Book>> {
        let mut storage = self.storage.write().await;
        let Some(book) = storage.books.get(&book_id).cloned() else {
            return Ok(None);
        };
        let present = storage
            .library
            .values()
            .any(|m| m.user_id == user_id && m.book_id == book_id);
        if !present {
            let membership = LibraryMembership {
                id: storage.library_ids.next(),
                book_id,
                user_id,
                created_at: Utc::now(),
            };
            debug!(membership_id = membership.id, "Library membership saved");
            storage.library.insert(membership.id, membership);
        }
        Ok(Some(book))
    }

    #[instrument(skip(self))]
    async fn delete_membership(&self, user_id: i64, book_id: i64) -> Result<bool> {
        let mut storage = self.storage.write().await;
        let before = storage.library.len();
        storage
            .library
            .retain(|_, m| !(m.user_id == user_id && m.book_id == book_id));
        Ok(storage.library.len() < before)
    }
}
