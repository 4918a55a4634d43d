use crate::presentation::auth::{authenticate, logout, register};
use crate::presentation::favorites::{
    add_favorite, check_favorite, list_favorites, remove_favorite,
};
use crate::presentation::handlers::{
    ApiError, create_author, create_book, delete_author, delete_book, get_author, get_book,
    health_check, list_authors, list_books, update_author, update_book,
};
use crate::presentation::library::{
    add_to_library, get_library_book, list_library, remove_from_library,
};
use actix_web::web;

/// Registers every endpoint. Shared by the binary and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed bodies get the same error shape as everything else
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into());

    cfg.app_data(json_config)
        .route("/health", web::get().to(health_check))
        .service(
            web::resource("/favorites")
                .route(web::get().to(list_favorites))
                .route(web::post().to(add_favorite))
                .route(web::delete().to(remove_favorite)),
        )
        .route("/favorites/check", web::get().to(check_favorite))
        .route("/users", web::post().to(register))
        .service(
            web::resource("/users/authentication")
                .route(web::post().to(authenticate))
                .route(web::delete().to(logout)),
        )
        .route("/users/{id}/books", web::get().to(list_library))
        .service(
            web::resource("/users/{user_id}/books/{book_id}")
                .route(web::get().to(get_library_book))
                .route(web::post().to(add_to_library))
                .route(web::delete().to(remove_from_library)),
        )
        .service(
            web::resource("/authors")
                .route(web::get().to(list_authors))
                .route(web::post().to(create_author)),
        )
        .service(
            web::resource("/authors/{id}")
                .route(web::get().to(get_author))
                .route(web::put().to(update_author))
                .route(web::delete().to(delete_author)),
        )
        .service(
            web::resource("/books")
                .route(web::get().to(list_books))
                .route(web::post().to(create_book)),
        )
        .service(
            web::resource("/books/{id}")
                .route(web::get().to(get_book))
                .route(web::put().to(update_book))
                .route(web::delete().to(delete_book)),
        );
}
