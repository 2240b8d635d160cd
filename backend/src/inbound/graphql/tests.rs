//! Schema-level tests executed without HTTP.

use super::*;
use crate::inbound::http::test_utils::world_state;
use crate::test_support::{SocialWorld, social_world};
use async_graphql::Request;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
async fn world() -> SocialWorld {
    social_world().await.expect("fixture world")
}

fn schema(world: &SocialWorld) -> SocialSchema {
    build_schema(&world_state(world).expect("http state"))
}

async fn run(schema: &SocialSchema, query: &str, viewer: Option<Viewer>) -> async_graphql::Response {
    let mut request = Request::new(query);
    if let Some(viewer) = viewer {
        request = request.data(viewer);
    }
    schema.execute(request).await
}

fn data(response: async_graphql::Response) -> Value {
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    response.data.into_json().expect("data as json")
}

fn first_code(response: &async_graphql::Response) -> Option<String> {
    let error = response.errors.first()?;
    let code = error.extensions.as_ref()?.get("code")?;
    match code {
        async_graphql::Value::String(code) => Some(code.clone()),
        _ => None,
    }
}

#[rstest]
#[tokio::test]
async fn field_names_match_the_operation_table(#[future] world: SocialWorld) {
    let world = world.await;
    let sdl = schema(&world).sdl();
    for spec in crate::domain::OPERATIONS {
        assert!(
            sdl.contains(&format!("{}(", spec.name)) || sdl.contains(&format!("{}:", spec.name)),
            "schema is missing {}",
            spec.name
        );
    }
}

#[rstest]
#[tokio::test]
async fn anonymous_post_listing_hides_private_posts(#[future] world: SocialWorld) {
    let world = world.await;
    let value = data(run(&schema(&world), "{ allPosts { title isPublic authorId } }", None).await);
    assert_eq!(
        value["allPosts"],
        json!([
            { "title": "Welcome", "isPublic": true, "authorId": world.admin.id.get() },
            { "title": "Notes", "isPublic": true, "authorId": world.jane.id.get() }
        ])
    );
}

#[rstest]
#[tokio::test]
async fn nested_fields_respect_visibility(#[future] world: SocialWorld) {
    let world = world.await;
    let query = format!(
        "{{ userById(id: {}) {{ username posts {{ title comments {{ content author {{ username }} }} }} }} }}",
        world.john.id
    );
    let schema = schema(&world);

    let anonymous = data(run(&schema, &query, None).await);
    assert_eq!(anonymous["userById"]["posts"], json!([]));

    let john = data(run(&schema, &query, Some(SocialWorld::viewer(&world.john))).await);
    assert_eq!(
        john["userById"]["posts"],
        json!([{
            "title": "Draft",
            "comments": [{ "content": "Reminder to self", "author": { "username": "john" } }]
        }])
    );
}

#[rstest]
#[tokio::test]
async fn missing_user_reports_not_found_code(#[future] world: SocialWorld) {
    let world = world.await;
    let response = run(&schema(&world), "{ userById(id: 999) { id } }", None).await;
    assert_eq!(first_code(&response).as_deref(), Some("not_found"));
}

#[rstest]
#[tokio::test]
async fn create_post_requires_login_and_uses_viewer_as_author(#[future] world: SocialWorld) {
    let world = world.await;
    let schema = schema(&world);
    let mutation = r#"mutation { createPost(title: "Hi", content: "There", isPublic: false) { authorId isPublic } }"#;

    let anonymous = run(&schema, mutation, None).await;
    assert_eq!(first_code(&anonymous).as_deref(), Some("unauthorized"));

    let value = data(run(&schema, mutation, Some(SocialWorld::viewer(&world.jane))).await);
    assert_eq!(
        value["createPost"],
        json!({ "authorId": world.jane.id.get(), "isPublic": false })
    );
}

#[rstest]
#[tokio::test]
async fn duplicate_username_reports_conflict(#[future] world: SocialWorld) {
    let world = world.await;
    let mutation = r#"mutation { createUser(username: "john", email: "other@social.example", password: "pw") { id } }"#;
    let response = run(&schema(&world), mutation, None).await;
    assert_eq!(first_code(&response).as_deref(), Some("conflict"));
    let details = response.errors[0]
        .extensions
        .as_ref()
        .and_then(|ext| ext.get("details"))
        .cloned()
        .expect("details")
        .into_json()
        .expect("json");
    assert_eq!(details, json!({ "field": "username" }));
}

#[rstest]
#[tokio::test]
async fn users_never_expose_password_hashes(#[future] world: SocialWorld) {
    let world = world.await;
    let response = run(&schema(&world), "{ allUsers { passwordHash } }", None).await;
    assert_eq!(first_code(&response).as_deref(), Some("bad_request"));
}

#[rstest]
#[case::removed_operation(r#"mutation { systemCommand(command: "id") }"#, "bad_request")]
#[case::wrong_argument_type(r#"{ userById(id: "abc") { id } }"#, "invalid_request")]
#[case::missing_argument("{ userById { id } }", "invalid_request")]
#[case::syntax_error("{ allPosts { id ", "invalid_request")]
#[tokio::test]
async fn rejected_documents_carry_a_code(
    #[future] world: SocialWorld,
    #[case] query: &str,
    #[case] code: &str,
) {
    let world = world.await;
    let response = run(&schema(&world), query, None).await;
    assert!(!response.errors.is_empty());
    assert!(
        response.errors.iter().all(|error| {
            error
                .extensions
                .as_ref()
                .and_then(|ext| ext.get("code"))
                .is_some()
        }),
        "uncoded errors: {:?}",
        response.errors
    );
    assert_eq!(first_code(&response).as_deref(), Some(code));
}

#[rstest]
#[tokio::test]
async fn overly_deep_queries_are_rejected(#[future] world: SocialWorld) {
    let world = world.await;
    let mut query = String::from("id");
    for _ in 0..6 {
        query = format!("author {{ posts {{ {query} }} }}");
    }
    let query = format!("{{ allPosts {{ {query} }} }}");
    let response = run(&schema(&world), &query, None).await;
    assert_eq!(first_code(&response).as_deref(), Some("invalid_request"));
    assert!(response.data.into_json().expect("json").is_null());
}
