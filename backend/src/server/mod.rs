//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{BuildMode, ServerConfig, ServerSettings, key_fingerprint};
pub(crate) use state_builders::Store;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use std::future::Future;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::NormalizePath;
use actix_web::{App, HttpServer, web};

use skymarket::Trace;
#[cfg(debug_assertions)]
use skymarket::doc::ApiDoc;
use skymarket::inbound::http::api_scope;
use skymarket::inbound::http::health::{HealthState, live, ready};
use skymarket::inbound::http::state::HttpState;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    // Trimming stays inside the API scope; Swagger UI needs `/docs/`.
    let api = api_scope().wrap(session).wrap(NormalizePath::trim());

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app
        .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Fail the probes, then stop accepting work once `shutdown` resolves.
async fn drain_on<F>(shutdown: F, health_state: web::Data<HealthState>, handle: ServerHandle)
where
    F: Future<Output = ()>,
{
    shutdown.await;
    info!("shutdown requested; draining");
    health_state.mark_draining();
    handle.stop(true).await;
}

/// Construct the HTTP server over `store`, draining when `shutdown`
/// resolves.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub(crate) fn create_server<F>(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    store: &Store,
    shutdown: F,
) -> std::io::Result<Server>
where
    F: Future<Output = ()> + 'static,
{
    let server_health_state = health_state.clone();
    let http_state = store.http_state();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .disable_signals()
    .run();

    actix_web::rt::spawn(drain_on(shutdown, health_state.clone(), server.handle()));
    health_state.mark_ready();
    Ok(server)
}
