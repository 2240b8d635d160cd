//! Registry endpoint: run any named operation over plain JSON.
//!
//! ```text
//! POST /api/v1/operations {"operation":"postsByAuthor","arguments":{"authorId":1}}
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};

use crate::domain::{Error, OperationRequest, OperationResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{redact_if_internal, status_for};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Execute one registered operation as the session's viewer.
///
/// Successful calls answer `200 {"data": {...}}`; failures answer
/// `{"errors": [...]}` with the status of the first error's code.
#[utoipa::path(
    post,
    path = "/api/v1/operations",
    request_body = OperationRequest,
    responses(
        (status = 200, description = "Operation result keyed by operation name"),
        (status = 400, description = "Unknown operation or invalid arguments"),
        (status = 401, description = "Login required"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Conflict"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["operations"],
    operation_id = "executeOperation",
    security([], ("SessionCookie" = []))
)]
#[post("/operations")]
pub async fn execute_operation(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OperationRequest>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer(&state.queries).await?;
    let response = state
        .registry
        .execute(payload.into_inner(), viewer.as_ref())
        .await;
    Ok(render(response))
}

fn render(response: OperationResponse) -> HttpResponse {
    match &response {
        OperationResponse::Data(_) => HttpResponse::Ok().json(&response),
        OperationResponse::Errors(errors) => {
            let status = errors
                .first()
                .map_or(StatusCode::INTERNAL_SERVER_ERROR, |err| status_for(err.code()));
            let errors: Vec<Error> = errors.iter().map(redact_if_internal).collect();
            HttpResponse::build(status).json(OperationResponse::Errors(errors))
        }
    }
}
