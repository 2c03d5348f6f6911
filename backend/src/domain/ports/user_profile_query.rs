//! Driving port for user lookups.
//!
//! Inbound adapters use this port to turn a session's user id into a
//! [`User`] without importing persistence details.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Load a user, or `None` when the account no longer exists.
    async fn find_user(&self, user_id: &UserId) -> Result<Option<User>, Error>;
}
