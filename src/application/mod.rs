pub mod author_service;
pub mod book_service;
pub mod favorite_service;
pub mod library_service;
pub mod user_service;
