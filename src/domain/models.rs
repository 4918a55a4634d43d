use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub biography: Option<String>,
    pub portrait_url: Option<String>,
}

impl Author {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub portrait_url: Option<String>,
}

impl NewAuthor {
    pub fn validate(&self) -> Result<(), DomainError> {
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)
    }
}

/// Partial author update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub biography: Option<String>,
    pub portrait_url: Option<String>,
}

impl AuthorChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(first_name) = &self.first_name {
            require("firstName", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            require("lastName", last_name)?;
        }
        Ok(())
    }

    pub fn apply(self, author: &mut Author) {
        if let Some(first_name) = self.first_name {
            author.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            author.last_name = last_name;
        }
        if self.biography.is_some() {
            author.biography = self.biography;
        }
        if self.portrait_url.is_some() {
            author.portrait_url = self.portrait_url;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub description: String,
    pub cover_url: String,
    pub author_id: i64,
}

/// The five fields a book is made of, all required on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub genre: String,
    pub description: String,
    pub cover_url: String,
    pub author_id: i64,
}

impl NewBook {
    pub fn validate(&self) -> Result<(), DomainError> {
        require("title", &self.title)?;
        require("genre", &self.genre)?;
        require("description", &self.description)?;
        require("coverUrl", &self.cover_url)?;
        if self.author_id <= 0 {
            return Err(DomainError::Validation("authorId is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookChanges {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub author_id: Option<i64>,
}

impl BookChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        let text_fields = [
            ("title", &self.title),
            ("genre", &self.genre),
            ("description", &self.description),
            ("coverUrl", &self.cover_url),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                require(field, value)?;
            }
        }
        if matches!(self.author_id, Some(id) if id <= 0) {
            return Err(DomainError::Validation("authorId is invalid".to_string()));
        }
        Ok(())
    }

    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(description) = self.description {
            book.description = description;
        }
        if let Some(cover_url) = self.cover_url {
            book.cover_url = cover_url;
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A favorite as returned after removal: the row's own id is withheld.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemovedFavorite {
    pub book_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Favorite> for RemovedFavorite {
    fn from(favorite: Favorite) -> Self {
        Self {
            book_id: favorite.book_id,
            user_id: favorite.user_id,
            created_at: favorite.created_at,
        }
    }
}

/// A favorite joined with the fields of the book it points at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBook {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub genre: String,
    pub description: String,
    pub cover_url: String,
    pub author_id: i64,
}

impl FavoriteBook {
    pub fn join(favorite: &Favorite, book: &Book) -> Self {
        Self {
            id: favorite.id,
            book_id: favorite.book_id,
            user_id: favorite.user_id,
            created_at: favorite.created_at,
            title: book.title.clone(),
            genre: book.genre.clone(),
            description: book.description.clone(),
            cover_url: book.cover_url.clone(),
            author_id: book.author_id,
        }
    }
}

/// Outcome of an atomic insert-if-absent on the favorites table.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteInsert {
    Created(Favorite),
    Existing(Favorite),
    BookMissing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryMembership {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// An identifier as it arrives over the wire: a JSON number, a string, or
/// something else entirely. Nothing is coerced until `parse` is called.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawId {
    pub fn parse(&self, field: &str) -> Result<i64, DomainError> {
        let id = match self {
            RawId::Number(n) => Some(*n),
            RawId::Text(s) => s.trim().parse::<i64>().ok(),
            RawId::Other(_) => None,
        };
        match id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(DomainError::Validation(format!(
                "{} must be a positive integer",
                field
            ))),
        }
    }
}

pub fn parse_id(field: &str, raw: Option<&RawId>) -> Result<i64, DomainError> {
    raw.ok_or_else(|| DomainError::Validation(format!("{} is required", field)))?
        .parse(field)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    #[serde(default)]
    pub book_id: Option<RawId>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteQuery {
    pub book_id: Option<String>,
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
