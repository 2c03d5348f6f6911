//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Register a regular (non-admin) account.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;
}
