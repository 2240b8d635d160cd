//! GraphQL inbound adapter.
//!
//! The Query and Mutation roots expose the same operations as the registry
//! under the same camelCase names and call the same services. The session's
//! user is attached to each request as a [`Viewer`]; failures carry their
//! domain code in `extensions.code`, engine rejections included.

use actix_web::{HttpResponse, get, post, web};
use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use tracing::warn;

use crate::domain::{Error, MutationService, QueryService, Viewer};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::redact_if_internal;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

mod error_codes;
mod mutation;
mod query;
pub mod types;

pub use error_codes::ErrorCodes;
pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// Maximum selection depth accepted by the schema.
pub const MAX_DEPTH: usize = 10;
/// Maximum query complexity accepted by the schema.
pub const MAX_COMPLEXITY: usize = 256;

/// Executable schema type.
pub type SocialSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema over the services held by `state`.
pub fn build_schema(state: &HttpState) -> SocialSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state.queries.clone())
        .data(state.mutations.clone())
        .limit_depth(MAX_DEPTH)
        .limit_complexity(MAX_COMPLEXITY)
        .extension(ErrorCodes)
        .finish()
}

/// Convert a domain failure into a GraphQL error with `extensions.code`.
pub(crate) fn to_graphql_error(err: Error) -> async_graphql::Error {
    let err = redact_if_internal(&err);
    let code = err.code();
    let trace_id = err.trace_id().map(str::to_owned);
    let details = err
        .details()
        .and_then(|value| async_graphql::Value::from_json(value.clone()).ok());
    async_graphql::Error::new(err.message()).extend_with(|_, ext| {
        ext.set("code", code.as_str());
        if let Some(id) = &trace_id {
            ext.set("traceId", id.as_str());
        }
        if let Some(details) = &details {
            ext.set("details", details.clone());
        }
    })
}

fn queries<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a QueryService> {
    ctx.data::<QueryService>()
}

fn mutations<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a MutationService> {
    ctx.data::<MutationService>()
}

fn viewer<'a>(ctx: &Context<'a>) -> Option<&'a Viewer> {
    ctx.data_opt::<Viewer>()
}

/// `POST /graphql`
#[post("/graphql")]
pub async fn graphql(
    schema: web::Data<SocialSchema>,
    state: web::Data<HttpState>,
    session: SessionContext,
    request: GraphQLRequest,
) -> ApiResult<GraphQLResponse> {
    let mut request = request.into_inner();
    if let Some(viewer) = session.viewer(&state.queries).await? {
        request = request.data(viewer);
    }
    let response = schema.execute(request).await;
    if response.is_err() {
        let codes: Vec<String> = response
            .errors
            .iter()
            .filter_map(|e| e.extensions.as_ref()?.get("code").map(ToString::to_string))
            .collect();
        warn!(?codes, "graphql request returned errors");
    }
    Ok(response.into())
}

/// `GET /graphiql`, registered in debug builds only.
#[get("/graphiql")]
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

#[cfg(test)]
mod tests;
