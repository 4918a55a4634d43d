use crate::domain::models::{FavoriteQuery, FavoriteRequest, RawId};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

// AuthenticatedUser comes first in every signature so an anonymous request
// is rejected before its body is read.

#[instrument(skip(state), fields(user_id = user.user_id))]
pub async fn list_favorites(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let favorites = state.favorites.list_favorites(user.user_id).await?;
    Ok(HttpResponse::Ok().json(favorites))
}

#[instrument(skip(state), fields(user_id = user.user_id))]
pub async fn check_favorite(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    query: web::Query<FavoriteQuery>,
) -> Result<HttpResponse, ApiError> {
    let book_id = query.into_inner().book_id.map(RawId::Text);
    let is_favorite = state
        .favorites
        .check_favorite(user.user_id, book_id.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(is_favorite))
}

#[instrument(skip(state), fields(user_id = user.user_id))]
pub async fn add_favorite(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    req: web::Json<FavoriteRequest>,
) -> Result<HttpResponse, ApiError> {
    let favorite = state
        .favorites
        .add_favorite(user.user_id, req.book_id.as_ref())
        .await?;
    info!(book_id = favorite.book_id, "Favorite stored");
    Ok(HttpResponse::Ok().json(favorite))
}

#[instrument(skip(state), fields(user_id = user.user_id))]
pub async fn remove_favorite(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    req: web::Json<FavoriteRequest>,
) -> Result<HttpResponse, ApiError> {
    let removed = state
        .favorites
        .remove_favorite(user.user_id, req.book_id.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(removed))
}
