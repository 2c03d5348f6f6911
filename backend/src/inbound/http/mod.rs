//! HTTP inbound adapter exposing REST endpoints.

use actix_web::{Scope, web};

pub mod ads;
pub mod comments;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Every resource route under `/api/v1`, with extractor error handlers.
///
/// `/ads/me` is registered ahead of `/ads/{id}` so it is not captured as an
/// identifier.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(validation::json_config())
        .app_data(validation::query_config())
        .app_data(validation::path_config())
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(ads::list_ads)
        .service(ads::create_ad)
        .service(ads::list_my_ads)
        .service(comments::list_comments)
        .service(comments::create_comment)
        .service(comments::get_comment)
        .service(comments::update_comment)
        .service(comments::patch_comment)
        .service(comments::delete_comment)
        .service(ads::get_ad)
        .service(ads::update_ad)
        .service(ads::patch_ad)
        .service(ads::delete_ad)
}
