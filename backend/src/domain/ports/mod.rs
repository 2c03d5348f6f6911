//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound persistence
//! adapters. Driving ports (`*Query`, `*Command`, [`LoginService`]) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod ad_repository;
mod ads_command;
mod ads_query;
mod comment_repository;
mod comments_command;
mod comments_query;
mod login_service;
mod user_profile_query;
mod user_repository;

pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use ad_repository::{AdRepository, AdRepositoryError};
#[cfg(test)]
pub use ad_repository::MockAdRepository;
pub use ads_command::AdsCommand;
#[cfg(test)]
pub use ads_command::MockAdsCommand;
pub use ads_query::{AD_PAGE_SIZE, AdPage, AdsQuery, INVALID_PAGE_MESSAGE, ListAdsRequest};
#[cfg(test)]
pub use ads_query::MockAdsQuery;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comments_command::CommentsCommand;
#[cfg(test)]
pub use comments_command::MockCommentsCommand;
pub use comments_query::CommentsQuery;
#[cfg(test)]
pub use comments_query::MockCommentsQuery;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredUser, UserPersistenceError, UserRepository};
