//! Shared harness for integration tests: the full `/api/v1` surface over a
//! fresh in-memory store.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use skymarket::Trace;
use skymarket::domain::AccountsService;
use skymarket::domain::ports::{AdRepository, CommentRepository, UserRepository};
use skymarket::inbound::http::api_scope;
use skymarket::inbound::http::state::HttpState;
use skymarket::outbound::memory::MemoryStore;

pub const PASSWORD: &str = "correct-horse-battery";
pub const ADMIN: &str = "root";

/// Initialised service under test.
pub trait TestApp:
    Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

impl<S> TestApp for S where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

/// Start the API over an empty store holding only the administrator.
pub async fn start() -> impl TestApp {
    let store = Arc::new(MemoryStore::default());
    serve(store.clone(), store.clone(), store).await
}

/// Start the API over the given repositories after ensuring the
/// administrator.
pub async fn serve<U, A, C>(users: Arc<U>, ads: Arc<A>, comments: Arc<C>) -> impl TestApp
where
    U: UserRepository + 'static,
    A: AdRepository + 'static,
    C: CommentRepository + 'static,
{
    AccountsService::new(users.clone())
        .ensure_admin(ADMIN, PASSWORD)
        .await
        .expect("administrator bootstrap");
    let state = HttpState::from_repositories(users, ads, comments);
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(api_scope().wrap(session)),
    )
    .await
}

/// Caller identity: an optional session cookie.
#[derive(Clone, Default)]
pub struct Caller {
    cookie: Option<Cookie<'static>>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Register `username` (unless it is the administrator) and log in.
    pub async fn signed_up(app: &impl TestApp, username: &str) -> Self {
        let credentials = json!({"username": username, "password": PASSWORD});
        if username != ADMIN {
            let (status, _) = Self::anonymous()
                .send(app, test::TestRequest::post().uri("/api/v1/users"), Some(&credentials))
                .await;
            assert_eq!(status, StatusCode::CREATED, "register {username}");
        }
        let response = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "login {username}");
        let cookie = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(Cookie::into_owned)
            .expect("session cookie");
        Self {
            cookie: Some(cookie),
        }
    }

    /// Send `request` with an optional JSON body; returns status and JSON
    /// (`Null` for empty bodies).
    pub async fn send(
        &self,
        app: &impl TestApp,
        request: test::TestRequest,
        body: Option<&Value>,
    ) -> (StatusCode, Value) {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let request = match body {
            Some(body) => request.set_json(body),
            None => request,
        };
        let response = test::call_service(app, request.to_request()).await;
        let status = response.status();
        let bytes = test::read_body(response).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, value)
    }

    pub async fn get(&self, app: &impl TestApp, uri: &str) -> (StatusCode, Value) {
        self.send(app, test::TestRequest::get().uri(uri), None).await
    }

    pub async fn post(&self, app: &impl TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(app, test::TestRequest::post().uri(uri), Some(&body))
            .await
    }

    pub async fn patch(&self, app: &impl TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(app, test::TestRequest::patch().uri(uri), Some(&body))
            .await
    }

    pub async fn delete(&self, app: &impl TestApp, uri: &str) -> (StatusCode, Value) {
        self.send(app, test::TestRequest::delete().uri(uri), None)
            .await
    }

    /// Publish an ad and return its body.
    pub async fn publish(&self, app: &impl TestApp, title: &str, price: i64) -> Value {
        let (status, body) = self
            .post(
                app,
                "/api/v1/ads",
                json!({
                    "title": title,
                    "description": format!("{title} in good condition"),
                    "price": price,
                    "category": "misc",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "publish {title}");
        body
    }

    /// Identifier of the logged-in account.
    pub async fn id(&self, app: &impl TestApp) -> Value {
        let (status, body) = self.get(app, "/api/v1/users/me").await;
        assert_eq!(status, StatusCode::OK);
        body.get("id").cloned().expect("user id")
    }
}

pub fn ad_id(ad: &Value) -> i64 {
    ad.get("id").and_then(Value::as_i64).expect("ad id")
}

pub fn result_count(page: &Value) -> usize {
    page.get("results")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}
