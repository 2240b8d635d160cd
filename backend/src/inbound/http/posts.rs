//! Post listing for the signed-in (or anonymous) caller.

use actix_web::{get, web};

use crate::domain::{Error, Post};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Posts visible to the caller: public posts, plus the caller's own private
/// posts, plus everything for admins.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    responses(
        (status = 200, description = "Visible posts", body = [Post]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([], ("SessionCookie" = []))
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Post>>> {
    let viewer = session.viewer(&state.queries).await?;
    Ok(web::Json(state.queries.all_posts(viewer.as_ref()).await?))
}
