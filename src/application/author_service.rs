use crate::domain::error::DomainError;
use crate::domain::models::{Author, AuthorChanges, NewAuthor};
use crate::domain::repository::AuthorRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct AuthorService<R: AuthorRepository> {
    repository: Arc<R>,
}

fn not_found(id: i64) -> anyhow::Error {
    DomainError::NotFound(format!("Author {} not found", id)).into()
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        self.repository.list_authors().await
    }

    #[instrument(skip(self, author))]
    pub async fn create_author(&self, author: NewAuthor) -> Result<Author> {
        author.validate()?;
        let author = self.repository.insert_author(author).await?;
        info!(author_id = author.id, "Author created");
        Ok(author)
    }

    #[instrument(skip(self))]
    pub async fn get_author(&self, id: i64) -> Result<Author> {
        self.repository
            .find_author(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    #[instrument(skip(self, changes))]
    pub async fn update_author(&self, id: i64, changes: AuthorChanges) -> Result<Author> {
        changes.validate()?;
        self.repository
            .update_author(id, changes)
            .await?
            .ok_or_else(|| not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_author(&self, id: i64) -> Result<Author> {
        let author = self
            .repository
            .delete_author(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(author_id = id, "Author deleted");
        Ok(author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryCatalog;

    fn service() -> AuthorService<InMemoryCatalog> {
        AuthorService::new(Arc::new(InMemoryCatalog::new()))
    }

    fn new_author(first_name: &str, last_name: &str) -> NewAuthor {
        NewAuthor {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            biography: None,
            portrait_url: None,
        }
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let service = service();
        let author = service.create_author(new_author("Mary", "Shelley")).await.unwrap();

        let updated = service
            .update_author(
                author.id,
                AuthorChanges {
                    biography: Some("Frankenstein.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Mary");
        assert_eq!(updated.biography.as_deref(), Some("Frankenstein."));
    }

    #[tokio::test]
    async fn test_missing_author_is_not_found_everywhere() {
        let service = service();
        for err in [
            service.get_author(3).await.unwrap_err(),
            service.update_author(3, AuthorChanges::default()).await.unwrap_err(),
            service.delete_author(3).await.unwrap_err(),
        ] {
            assert!(matches!(
                err.downcast_ref::<DomainError>(),
                Some(DomainError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_create_requires_names() {
        let err = service().create_author(new_author("", "Shelley")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get_fails() {
        let service = service();
        let author = service.create_author(new_author("Mary", "Shelley")).await.unwrap();

        assert_eq!(service.delete_author(author.id).await.unwrap(), author);
        assert!(service.get_author(author.id).await.is_err());
        assert!(service.list_authors().await.unwrap().is_empty());
    }
}
