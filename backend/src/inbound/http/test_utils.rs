//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::json;

use crate::domain::ports::{StoredUser, UserRepository};
use crate::domain::{PasswordDigest, User, UserId, Username};
use crate::inbound::http::api_scope;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryStore;

/// Password shared by every seeded account.
pub const PASSWORD: &str = "correct-horse-battery";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Memory-backed state with members `ada` and `bob` and administrator
/// `root`.
pub async fn seeded_state() -> HttpState {
    let store = Arc::new(MemoryStore::default());
    for (name, admin) in [("ada", false), ("bob", false), ("root", true)] {
        let username = Username::new(name).expect("fixture username");
        let user = if admin {
            User::admin(UserId::random(), username)
        } else {
            User::new(UserId::random(), username)
        };
        UserRepository::create(
            store.as_ref(),
            &StoredUser {
                user,
                password: PasswordDigest::generate(PASSWORD).expect("hash password"),
            },
        )
        .await
        .expect("seed user");
    }
    HttpState::from_repositories(store.clone(), store.clone(), store)
}

/// The full `/api/v1` scope over `state`, behind test session middleware.
pub fn api_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(api_scope())
}

/// Log `username` in with [`PASSWORD`] and return the session cookie.
pub async fn login_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({"username": username, "password": PASSWORD}))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login as {username} failed");
    session_cookie(&response)
}
