//! Driving port for ad mutations.

use async_trait::async_trait;

use crate::domain::{Ad, AdAction, AdContent, AdId, AdUpdate, Error, Requester};

/// Domain use-case port for creating, changing and deleting ads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdsCommand: Send + Sync {
    /// Publish a new ad authored by the requester.
    async fn create(&self, requester: &Requester, content: AdContent) -> Result<Ad, Error>;

    /// Replace or patch an existing ad.
    async fn update(&self, requester: &Requester, id: AdId, update: AdUpdate)
    -> Result<Ad, Error>;

    /// Run both permission phases for `action` on an existing ad without
    /// changing it.
    async fn authorize(&self, requester: &Requester, id: AdId, action: AdAction)
    -> Result<(), Error>;

    /// Delete an ad and its comments.
    async fn destroy(&self, requester: &Requester, id: AdId) -> Result<(), Error>;
}
