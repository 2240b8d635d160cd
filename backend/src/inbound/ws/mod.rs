//! WebSocket inbound adapter.
//!
//! Responsibilities:
//! - validate upgrade requests against the origin allow-list
//! - resolve the session's viewer once per connection
//! - hand the socket to the per-connection session loop

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{debug, error, warn};
use url::Url;

use crate::domain::Viewer;
use crate::inbound::http::session::SessionContext;

use self::origin::OriginPolicy;

mod session;

pub mod messages;
pub mod origin;
pub mod state;

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    auth: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }

    validate_origin(&state.origins, origin_header)?;

    let viewer = auth.viewer(&state.queries).await?;
    debug!(user_id = ?viewer.as_ref().map(Viewer::id), "WebSocket upgrade accepted");

    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;
    actix_web::rt::spawn(session::handle_ws_session(
        state.get_ref().clone(),
        viewer,
        ws_session,
        messages,
    ));
    Ok(response)
}

fn validate_origin(policy: &OriginPolicy, origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if policy.allows(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use rstest::rstest;

    fn policy() -> OriginPolicy {
        OriginPolicy::from_list("social.example")
    }

    #[rstest]
    #[case("http://localhost:3000")]
    #[case("https://social.example")]
    #[case("https://chat.social.example")]
    fn accepts_configured_origins(#[case] origin: &str) {
        let header = HeaderValue::from_str(origin).expect("valid header value");
        assert!(validate_origin(&policy(), &header).is_ok());
    }

    #[rstest]
    #[case(HeaderValue::from_static("https://example.com"), StatusCode::FORBIDDEN)]
    #[case(HeaderValue::from_static("not a url"), StatusCode::BAD_REQUEST)]
    #[case(
        HeaderValue::from_bytes(&[0x80]).expect("opaque header value"),
        StatusCode::BAD_REQUEST
    )]
    fn rejects_bad_origins(#[case] header: HeaderValue, #[case] status: StatusCode) {
        let error = validate_origin(&policy(), &header).expect_err("origin should be rejected");
        assert_eq!(error.as_response_error().status_code(), status);
    }
}
