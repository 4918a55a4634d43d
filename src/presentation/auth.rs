use crate::domain::user::{CreateUser, LoginRequest};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::SESSION_COOKIE;
use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, web};
use tracing::{error, info, instrument};

/// Readable by page scripts; carries only the id, never the session.
pub const USER_ID_COOKIE: &str = "userId";

fn session_cookies(token: String, user_id: i64, ttl_secs: u64) -> [Cookie<'static>; 2] {
    let max_age = Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX));
    [
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(max_age)
            .finish(),
        Cookie::build(USER_ID_COOKIE, user_id.to_string())
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(max_age)
            .finish(),
    ]
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name, "")
        .path("/")
        .max_age(Duration::seconds(0))
        .finish()
}

#[instrument(skip(state, req))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!(email = %req.email, "Registration request received");

    let user = state.users.register(req.into_inner()).await.map_err(|e| {
        error!(error = %e, "Failed to register user");
        ApiError::from(e)
    })?;

    info!(user_id = user.id, "User registered successfully");
    Ok(HttpResponse::Ok().json(user))
}

#[instrument(skip(state, req))]
pub async fn authenticate(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(email = %req.email, "Authentication request received");

    let session = state.users.authenticate(req.into_inner()).await?;
    let [session_cookie, user_id_cookie] = session_cookies(
        session.token,
        session.user.id,
        state.users.session_ttl_secs(),
    );

    info!(user_id = session.user.id, "Session established");
    Ok(HttpResponse::Ok()
        .cookie(session_cookie)
        .cookie(user_id_cookie)
        .finish())
}

#[instrument]
pub async fn logout() -> HttpResponse {
    info!("Session cleared");
    HttpResponse::Ok()
        .cookie(expired_cookie(SESSION_COOKIE))
        .cookie(expired_cookie(USER_ID_COOKIE))
        .finish()
}
