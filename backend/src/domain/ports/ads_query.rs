//! Driving port for ad reads.
//!
//! Inbound adapters call this port for the public listing, single-ad lookups
//! and the requester's own ads. Page-number semantics are resolved here; the
//! adapter only renders links.

use std::num::NonZeroU32;

use async_trait::async_trait;
use pagination::{PageRequest, PageSize};

use crate::domain::{Ad, AdFilter, AdId, Error, Requester};

/// Ads served per page.
pub const AD_PAGE_SIZE: PageSize = PageSize::from_non_zero(NonZeroU32::MIN.saturating_add(3));

/// Message for page numbers that are malformed or past the last page.
pub const INVALID_PAGE_MESSAGE: &str = "Invalid page.";

/// Request for one page of ads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAdsRequest {
    pub requester: Requester,
    pub filter: AdFilter,
    pub page: PageRequest,
}

/// One validated page of ads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdPage {
    pub page: PageRequest,
    pub size: PageSize,
    pub total: u64,
    pub ads: Vec<Ad>,
}

/// Domain use-case port for reading ads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdsQuery: Send + Sync {
    /// Page through every ad matching the filter.
    async fn list(&self, request: ListAdsRequest) -> Result<AdPage, Error>;

    /// Page through the requester's own ads.
    async fn list_mine(&self, request: ListAdsRequest) -> Result<AdPage, Error>;

    /// Fetch one ad.
    async fn retrieve(&self, requester: &Requester, id: AdId) -> Result<Ad, Error>;
}
