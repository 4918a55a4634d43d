use crate::domain::error::DomainError;
use crate::domain::models::{Favorite, FavoriteBook, FavoriteInsert, RawId, RemovedFavorite, parse_id};
use crate::domain::repository::FavoriteRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct FavoriteService<R: FavoriteRepository> {
    repository: Arc<R>,
}

impl<R: FavoriteRepository> FavoriteService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_favorites(&self, user_id: i64) -> Result<Vec<FavoriteBook>> {
        let favorites = self.repository.favorites_for_user(user_id).await?;
        debug!(count = favorites.len(), "Favorites listed");
        Ok(favorites)
    }

    #[instrument(skip(self))]
    pub async fn check_favorite(&self, user_id: i64, book_id: Option<&RawId>) -> Result<bool> {
        let book_id = parse_id("bookId", book_id)?;
        Ok(self
            .repository
            .find_favorite(user_id, book_id)
            .await?
            .is_some())
    }

    /// Adding a pair that is already a favorite returns the stored row.
    #[instrument(skip(self))]
    pub async fn add_favorite(&self, user_id: i64, book_id: Option<&RawId>) -> Result<Favorite> {
        let book_id = parse_id("bookId", book_id)?;
        match self.repository.insert_favorite(user_id, book_id).await? {
            FavoriteInsert::Created(favorite) => {
                info!(favorite_id = favorite.id, book_id, "Favorite added");
                Ok(favorite)
            }
            FavoriteInsert::Existing(favorite) => {
                debug!(favorite_id = favorite.id, book_id, "Favorite already present");
                Ok(favorite)
            }
            FavoriteInsert::BookMissing => {
                warn!(book_id, "Cannot favorite a missing book");
                Err(DomainError::NotFound(format!("Book {} not found", book_id)).into())
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_favorite(
        &self,
        user_id: i64,
        book_id: Option<&RawId>,
    ) -> Result<RemovedFavorite> {
        let book_id = parse_id("bookId", book_id)?;
        let favorite = self
            .repository
            .delete_favorite(user_id, book_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Favorite for book {} not found", book_id)))?;
        info!(favorite_id = favorite.id, book_id, "Favorite removed");
        Ok(favorite.into())
    }
}
