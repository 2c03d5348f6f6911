//! Domain primitives, aggregates, access policies and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the ports between them, and the services implementing the
//! driving ports. Types validate on construction and document their
//! invariants in Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - Ad, Comment, User: aggregates and their validated fields.
//! - Requester, Policy, AdAction, CommentAction: per-action permissions.
//! - AdsService, CommentsService, AccountsService: driving-port services.

pub mod accounts_service;
pub mod ad;
pub mod ads_service;
pub mod auth;
pub mod comment;
pub mod comments_service;
pub mod error;
pub mod permissions;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::accounts_service::AccountsService;
pub use self::ad::{
    Ad, AdContent, AdDescription, AdFilter, AdId, AdListQuery, AdListing, AdPatch, AdTitle,
    AdUpdate, AdValidationError, CATEGORY_MAX, Category, DESCRIPTION_MAX, NewAd, Price, TITLE_MAX,
};
pub use self::ads_service::AdsService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, PasswordDigest, PasswordDigestError,
    Registration,
};
pub use self::comment::{
    COMMENT_TEXT_MAX, Comment, CommentId, CommentText, CommentValidationError, NewComment,
};
pub use self::comments_service::CommentsService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::permissions::{AdAction, CommentAction, Policy, Predicate, Requester};
pub use self::trace_id::TraceId;
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use skymarket::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
