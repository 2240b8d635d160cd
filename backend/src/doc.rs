//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] covers the REST routes under `/api/v1` and the health probes.
//! GraphQL and WebSocket traffic are described by their own schema and
//! message types rather than OpenAPI.
//!
//! The document is served by Swagger UI in debug builds and printed by
//! `cargo run --bin openapi-dump` for external tooling.

use crate::domain::{Activity, Comment, Error, ErrorCode, OperationRequest, Post, Role, User};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Social backend API",
        description = "Session-authenticated REST routes, the operation registry, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::operations::execute_operation,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Role,
        Post,
        Comment,
        Activity,
        Error,
        ErrorCode,
        LoginRequest,
        OperationRequest
    )),
    tags(
        (name = "users", description = "Login, logout, and account listing"),
        (name = "posts", description = "Posts visible to the caller"),
        (name = "operations", description = "Named operations shared with GraphQL and WebSocket"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("User", "username")]
    #[case("User", "createdAt")]
    #[case("Post", "isPublic")]
    #[case("OperationRequest", "operation")]
    fn schemas_expose_camel_case_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert_object_schema_has_field(schemas.get(schema).expect("schema registered"), field);
    }

    #[rstest]
    fn user_schema_never_documents_password_hashes() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get("User").expect("User schema") {
            RefOr::T(Schema::Object(obj)) => {
                assert!(!obj.properties.keys().any(|key| key.contains("password")));
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/logout")]
    #[case("/api/v1/users/me")]
    #[case("/api/v1/users")]
    #[case("/api/v1/posts")]
    #[case("/api/v1/operations")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_rest_route_is_documented(#[case] path: &str) {
        assert!(ApiDoc::openapi().paths.paths.contains_key(path));
    }
}
