//! Tests for account and session handlers.

use super::*;
use crate::inbound::http::test_utils::{session_cookie, test_session_middleware, world_state};
use crate::test_support::{SocialWorld, WORLD_PASSWORD, social_world};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
async fn world() -> SocialWorld {
    social_world().await.expect("fixture world")
}

fn test_app(
    world: &SocialWorld,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let state = world_state(world).expect("http state");
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(logout)
                .service(current_user)
                .service(list_users),
        )
}

fn login_request(username: &str, password: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(LoginRequest {
            username: username.into(),
            password: password.into(),
        })
}

async fn body_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("json body")
}

#[rstest]
#[case("   ", "password", "username", "username must not be empty")]
#[case("admin", "", "password", "password must not be empty")]
#[actix_web::test]
async fn login_rejects_malformed_credentials(
    #[future] world: SocialWorld,
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
    #[case] message: &str,
) {
    let world = world.await;
    let app = actix_test::init_service(test_app(&world)).await;

    let response = actix_test::call_service(&app, login_request(username, password).to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = body_json(response).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["message"], message);
    assert_eq!(value["details"]["field"], field);
}

#[rstest]
#[case("admin", "wrong-password")]
#[case("nobody", WORLD_PASSWORD)]
#[actix_web::test]
async fn login_failures_are_uniform(
    #[future] world: SocialWorld,
    #[case] username: &str,
    #[case] password: &str,
) {
    let world = world.await;
    let app = actix_test::init_service(test_app(&world)).await;

    let response = actix_test::call_service(&app, login_request(username, password).to_request()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&response).is_none());
    let value = body_json(response).await;
    assert_eq!(value["code"], "unauthorized");
    assert_eq!(value["message"], "invalid credentials");
}

#[rstest]
#[actix_web::test]
async fn login_then_me_then_logout(#[future] world: SocialWorld) {
    let world = world.await;
    let app = actix_test::init_service(test_app(&world)).await;

    let login_res = actix_test::call_service(&app, login_request("jane", WORLD_PASSWORD).to_request()).await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = session_cookie(&login_res).expect("session cookie");
    let user = body_json(login_res).await;
    assert_eq!(user["username"], "jane");
    assert!(user.get("passwordHash").is_none());

    let me_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(me_res.status(), StatusCode::OK);
    let me = body_json(me_res).await;
    assert_eq!(me["id"], world.jane.id.get());
    assert_eq!(me["role"], "user");

    let logout_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&logout_res).expect("removal cookie");
    assert_eq!(cleared.value(), "");
}

#[rstest]
#[actix_web::test]
async fn list_users_returns_camel_case_json(#[future] world: SocialWorld) {
    let world = world.await;
    let app = actix_test::init_service(test_app(&world)).await;

    let login_res = actix_test::call_service(&app, login_request("admin", WORLD_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login_res).expect("session cookie");

    let users_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(users_res.status(), StatusCode::OK);
    let value = body_json(users_res).await;
    let users = value.as_array().expect("array");
    assert_eq!(users.len(), 3);
    assert!(users[0].get("createdAt").is_some());
    assert!(users[0].get("created_at").is_none());
    assert!(users.iter().all(|user| user.get("passwordHash").is_none()));
}

#[rstest]
#[case("/api/v1/users")]
#[case("/api/v1/users/me")]
#[actix_web::test]
async fn account_routes_require_a_session(#[future] world: SocialWorld, #[case] uri: &str) {
    let world = world.await;
    let app = actix_test::init_service(test_app(&world)).await;
    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
