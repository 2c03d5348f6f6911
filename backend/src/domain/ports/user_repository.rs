//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{PasswordDigest, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername { username: String } => "username {username} is already taken",
    }
}

/// A user together with the stored password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub password: PasswordDigest,
}

/// Port for reading and writing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, rejecting duplicate usernames.
    async fn create(&self, user: &StoredUser) -> Result<(), UserPersistenceError>;

    /// Insert or replace an account keyed by id.
    async fn upsert(&self, user: &StoredUser) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account and its password digest by username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError>;
}
