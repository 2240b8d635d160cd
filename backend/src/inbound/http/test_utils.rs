//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::AccountLoginService;
use crate::domain::ports::PasswordHasher;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::test_support::{FixtureError, InsecureTestHasher, SocialWorld};

/// Build a session middleware configured for tests.
///
/// Uses a fresh key per invocation, the cookie name `session`, and no
/// `Secure` flag so plain HTTP test requests keep the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state wired to the fixture world with the insecure test hasher.
pub fn world_state(world: &SocialWorld) -> Result<HttpState, FixtureError> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(InsecureTestHasher);
    let login = AccountLoginService::new(world.storage.users.clone(), hasher.clone())?;
    Ok(HttpState::from(HttpStatePorts {
        storage: world.storage.clone(),
        hasher,
        login: Arc::new(login),
    }))
}

/// Extract the session cookie set by a response, if any.
pub fn session_cookie(response: &ServiceResponse) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}
