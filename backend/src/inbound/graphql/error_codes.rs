//! Schema extension that gives every error an `extensions.code`.
//!
//! Resolver failures already carry their domain code. Parse and validation
//! failures raised by the engine do not, so they are classified here:
//! selecting a field the schema lacks is `bad_request`, anything else
//! rejected before execution is `invalid_request`. Uncoded errors raised
//! during execution are `internal_error`.

use std::sync::Arc;

use async_graphql::extensions::{Extension, ExtensionContext, ExtensionFactory, NextRequest};
use async_graphql::{Response, ServerError};

use crate::domain::ErrorCode;

/// Registered on the schema by [`super::build_schema`].
pub struct ErrorCodes;

impl ExtensionFactory for ErrorCodes {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(ErrorCodesExtension)
    }
}

struct ErrorCodesExtension;

#[async_trait::async_trait]
impl Extension for ErrorCodesExtension {
    async fn request(&self, ctx: &ExtensionContext<'_>, next: NextRequest<'_>) -> Response {
        let mut response = next.run(ctx).await;
        for error in &mut response.errors {
            tag(error);
        }
        response
    }
}

fn tag(error: &mut ServerError) {
    let extensions = error.extensions.get_or_insert_with(Default::default);
    if extensions.get("code").is_some() {
        return;
    }
    let code = classify(&error.message, !error.path.is_empty());
    extensions.set("code", code.as_str());
}

fn classify(message: &str, during_execution: bool) -> ErrorCode {
    if during_execution {
        ErrorCode::InternalError
    } else if message.starts_with("Unknown field") {
        ErrorCode::BadRequest
    } else {
        ErrorCode::InvalidRequest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Unknown field \"systemCommand\" on type \"MutationRoot\".", false, ErrorCode::BadRequest)]
    #[case("Invalid value for argument \"id\", expected type \"Int\"", false, ErrorCode::InvalidRequest)]
    #[case("Query is nested too deep.", false, ErrorCode::InvalidRequest)]
    #[case("Data `QueryService` does not exist.", true, ErrorCode::InternalError)]
    fn engine_errors_are_classified(
        #[case] message: &str,
        #[case] during_execution: bool,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(classify(message, during_execution), expected);
    }
}
