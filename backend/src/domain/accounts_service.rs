//! Account domain service: registration, login and profile lookups.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountsCommand, LoginService, StoredUser, UserPersistenceError, UserProfileQuery,
    UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, PasswordDigest, Registration, User, UserId, Username,
};

const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

fn hash_password(password: &str) -> Result<PasswordDigest, Error> {
    PasswordDigest::generate(password).map_err(|err| Error::internal(err.to_string()))
}

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict(format!("username {username} is already taken"))
        }
    }
}

/// Account service implementing [`LoginService`], [`AccountsCommand`] and
/// [`UserProfileQuery`].
#[derive(Clone)]
pub struct AccountsService<U> {
    users: Arc<U>,
}

impl<U> AccountsService<U> {
    /// Create a new service over the user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U> AccountsService<U>
where
    U: UserRepository,
{
    /// Make sure an administrator called `username` exists with `password`.
    ///
    /// An existing account keeps its id and is promoted; otherwise a new
    /// administrator is created.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for a malformed username and maps repository
    /// failures like every other operation.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<User, Error> {
        let username = Username::new(username.trim())
            .map_err(|err| Error::invalid_request(format!("invalid admin username: {err}")))?;
        let existing = self
            .users
            .find_by_username(username.as_ref())
            .await
            .map_err(map_repository_error)?;
        let id = existing
            .map(|stored| stored.user.id().clone())
            .unwrap_or_else(UserId::random);
        let admin = User::admin(id, username);
        self.users
            .upsert(&StoredUser {
                user: admin.clone(),
                password: hash_password(password)?,
            })
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %admin.id(), username = %admin.username(), "administrator ensured");
        Ok(admin)
    }
}

#[async_trait]
impl<U> LoginService for AccountsService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_repository_error)?;
        match stored {
            Some(stored) if stored.password.verify(credentials.password()) => {
                Ok(stored.user.id().clone())
            }
            _ => {
                warn!(username = credentials.username(), "login rejected");
                Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE))
            }
        }
    }
}

#[async_trait]
impl<U> AccountsCommand for AccountsService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let user = User::new(UserId::random(), registration.username().clone());
        self.users
            .create(&StoredUser {
                user: user.clone(),
                password: hash_password(registration.password())?,
            })
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id(), "account registered");
        Ok(user)
    }
}

#[async_trait]
impl<U> UserProfileQuery for AccountsService<U>
where
    U: UserRepository,
{
    async fn find_user(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_repository_error)
    }
}
