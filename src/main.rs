use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use shelfmark::data::memory::InMemoryCatalog;
use shelfmark::data::user_repository::InMemoryUserRepository;
use shelfmark::infrastructure::config::AppConfig;
use shelfmark::infrastructure::logging::init_logging;
use shelfmark::presentation::handlers::AppState;
use shelfmark::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};
use shelfmark::presentation::routes;
use std::sync::Arc;
use tracing::{error, info};

fn cors(allowed_origin: Option<&str>) -> Cors {
    match allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600),
        // Same-origin only
        None => Cors::default(),
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{:#}", e))
    })?;
    info!(
        address = %config.bind_addr(),
        session_ttl_secs = config.session_ttl_secs,
        "Configuration loaded"
    );

    let users = Arc::new(InMemoryUserRepository::new());
    let catalog = Arc::new(InMemoryCatalog::new());
    let state = web::Data::new(AppState::new(
        users,
        catalog,
        config.jwt_secret.clone(),
        config.session_ttl_secs,
    ));

    let jwt_secret = config.jwt_secret.clone();
    let allowed_origin = config.allowed_origin.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(cors(allowed_origin.as_deref()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(routes::configure)
    })
    .bind(config.bind_addr())?;

    info!(address = %config.bind_addr(), "Starting HTTP server");
    server.run().await
}
