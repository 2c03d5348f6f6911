//! OpenAPI document for the marketplace API.
//!
//! Registers every handler under `/api/v1` plus the health probes, the
//! request/response bodies, and the session cookie security scheme. Served by
//! Swagger UI in debug builds and printed by the `openapi-dump` binary.

use crate::inbound::http::ads::{AdPageResponse, AdPayload, AdResponse};
use crate::inbound::http::comments::{CommentPayload, CommentResponse};
use crate::inbound::http::health::{ProbeResponse, ProbeStatus};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UserResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

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
        title = "Skymarket API",
        description = "Classified ads with comments, session-authenticated accounts and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::ads::list_ads,
        crate::inbound::http::ads::list_my_ads,
        crate::inbound::http::ads::get_ad,
        crate::inbound::http::ads::create_ad,
        crate::inbound::http::ads::update_ad,
        crate::inbound::http::ads::patch_ad,
        crate::inbound::http::ads::delete_ad,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::get_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::patch_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        RegisterRequest,
        UserResponse,
        AdPayload,
        AdResponse,
        AdPageResponse,
        CommentPayload,
        CommentResponse,
        ProbeResponse,
        ProbeStatus
    )),
    tags(
        (name = "users", description = "Registration and sessions"),
        (name = "ads", description = "Classified ads"),
        (name = "comments", description = "Comments on ads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
