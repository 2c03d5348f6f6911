//! Port for ad persistence.

use async_trait::async_trait;

use crate::domain::{Ad, AdContent, AdId, AdListQuery, AdListing, NewAd};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ad repository adapters.
    pub enum AdRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ad repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ad repository query failed: {message}",
    }
}

/// Port for storing and querying ads.
///
/// Listings are ordered by ascending id, which matches insertion order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdRepository: Send + Sync {
    /// Insert an ad, assigning its id and creation time.
    async fn create(&self, ad: &NewAd) -> Result<Ad, AdRepositoryError>;

    /// Find an ad by id.
    async fn find_by_id(&self, id: AdId) -> Result<Option<Ad>, AdRepositoryError>;

    /// Count the filtered collection and load one window of it.
    async fn list(&self, query: &AdListQuery) -> Result<AdListing, AdRepositoryError>;

    /// Replace the writable fields of an ad. `None` when the ad is gone.
    async fn update(
        &self,
        id: AdId,
        content: &AdContent,
    ) -> Result<Option<Ad>, AdRepositoryError>;

    /// Delete an ad and its comments. Returns whether a row was removed.
    async fn delete(&self, id: AdId) -> Result<bool, AdRepositoryError>;
}
