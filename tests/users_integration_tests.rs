use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;
use shelfmark::data::memory::InMemoryCatalog;
use shelfmark::data::user_repository::InMemoryUserRepository;
use shelfmark::domain::models::NewBook;
use shelfmark::domain::repository::BookRepository;
use shelfmark::domain::user::{CreateUser, LoginRequest};
use shelfmark::presentation::handlers::AppState;
use shelfmark::presentation::middleware::JwtAuthMiddleware;
use shelfmark::presentation::routes;
use std::sync::Arc;

const JWT_SECRET: &str = "test-secret-key-for-users";

macro_rules! setup_users_test {
    () => {{
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog
            .insert_book(NewBook {
                title: "Persuasion".to_string(),
                genre: "Romance".to_string(),
                description: "Second chances.".to_string(),
                cover_url: "https://example.com/persuasion.jpg".to_string(),
                author_id: 1,
            })
            .await
            .unwrap();

        let state = web::Data::new(AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            catalog,
            JWT_SECRET.to_string(),
            3600,
        ));

        test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(JWT_SECRET.to_string()))
                .configure(routes::configure),
        )
        .await
    }};
}

fn registration(email: &str, password: &str) -> CreateUser {
    CreateUser {
        first_name: "Anne".to_string(),
        last_name: "Elliot".to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn response_cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

#[actix_web::test]
async fn test_register_returns_public_fields_only() {
    let app = setup_users_test!();

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&registration("anne@example.com", "kellynch"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    // Registration does not sign the caller in
    assert!(response_cookie(&resp, "session").is_none());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["firstName"], "Anne");
    assert_eq!(body["lastName"], "Elliot");
    assert_eq!(body["email"], "anne@example.com");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[actix_web::test]
async fn test_register_duplicate_email_is_conflict() {
    let app = setup_users_test!();

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&registration("dup@example.com", "first"))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&registration("dup@example.com", "second"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The original credentials still work, the new ones do not
    let req = test::TestRequest::post()
        .uri("/users/authentication")
        .set_json(&login("dup@example.com", "first"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/users/authentication")
        .set_json(&login("dup@example.com", "second"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_register_with_missing_field_is_bad_request() {
    let app = setup_users_test!();

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": "x@example.com", "password": "pw" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = setup_users_test!();

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&registration("anne@example.com", "kellynch"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/users/authentication")
        .set_json(&login("anne@example.com", "uppercross"))
        .to_request();
    let wrong_password = test::call_service(&app, req).await;
    let wrong_password_status = wrong_password.status();
    let wrong_password_body = test::read_body(wrong_password).await;

    let req = test::TestRequest::post()
        .uri("/users/authentication")
        .set_json(&login("nobody@example.com", "kellynch"))
        .to_request();
    let unknown_email = test::call_service(&app, req).await;
    let unknown_email_status = unknown_email.status();
    let unknown_email_body = test::read_body(unknown_email).await;

    assert_eq!(wrong_password_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password_status, unknown_email_status);
    assert_eq!(wrong_password_body, unknown_email_body);
}

#[actix_web::test]
async fn test_session_cookie_grants_access_until_logout() {
    let app = setup_users_test!();

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&registration("anne@example.com", "kellynch"))
        .to_request();
    let user: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/users/authentication")
        .set_json(&login("anne@example.com", "kellynch"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let session = response_cookie(&resp, "session").expect("session cookie");
    assert_eq!(session.http_only(), Some(true));
    let user_id_cookie = response_cookie(&resp, "userId").expect("userId cookie");
    assert_eq!(user_id_cookie.value(), user["id"].to_string());
    assert!(test::read_body(resp).await.is_empty());

    // The cookie alone authenticates
    let req = test::TestRequest::post()
        .uri("/favorites")
        .cookie(session.clone())
        .set_json(json!({ "bookId": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri("/users/authentication")
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = response_cookie(&resp, "session").expect("expired session cookie");
    assert_eq!(cleared.value(), "");
    assert_eq!(
        cleared.max_age(),
        Some(actix_web::cookie::time::Duration::seconds(0))
    );

    // Browser drops the cookie; a bare request is anonymous again
    let req = test::TestRequest::get().uri("/favorites").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_without_session_succeeds() {
    let app = setup_users_test!();

    let req = test::TestRequest::delete()
        .uri("/users/authentication")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
