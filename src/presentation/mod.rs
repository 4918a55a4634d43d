pub mod auth;
pub mod book_page;
pub mod favorites;
pub mod handlers;
pub mod library;
pub mod middleware;
pub mod routes;
