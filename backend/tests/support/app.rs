//! Shared harness for HTTP-level integration tests.
//!
//! Builds the production [`build_app`] over the in-memory fixture world with
//! a plain-HTTP session cookie and the insecure test hasher.

use std::sync::Arc;

use actix_http::Request;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use backend::domain::AccountLoginService;
use backend::domain::ports::PasswordHasher;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::SessionSettings;
use backend::inbound::http::state::HttpStatePorts;
use backend::inbound::ws::origin::OriginPolicy;
use backend::server::AppDependencies;
use backend::test_support::{InsecureTestHasher, SocialWorld, WORLD_PASSWORD};
use serde_json::{Value, json};

pub fn deps(world: &SocialWorld) -> AppDependencies {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(InsecureTestHasher);
    let login = AccountLoginService::new(world.storage.users.clone(), hasher.clone())
        .expect("login service");
    AppDependencies::new(
        HttpStatePorts {
            storage: world.storage.clone(),
            hasher,
            login: Arc::new(login),
        },
        SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        },
        OriginPolicy::default(),
        web::Data::new(HealthState::new()),
    )
}

/// Log in with the fixture password and return the session cookie.
pub async fn login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": WORLD_PASSWORD }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK, "login as {username}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Run a registry operation over `POST /api/v1/operations`.
pub async fn operation<S>(
    app: &S,
    cookie: Option<&Cookie<'static>>,
    name: &str,
    arguments: Value,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = test::TestRequest::post()
        .uri("/api/v1/operations")
        .set_json(json!({ "operation": name, "arguments": arguments }));
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

pub fn first_error_code(body: &Value) -> Option<&str> {
    body["errors"][0]["code"].as_str()
}
