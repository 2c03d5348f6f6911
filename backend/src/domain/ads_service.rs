//! Ad domain service.
//!
//! Implements the ad driving ports over an [`AdRepository`]. Every operation
//! evaluates the action's policy first; update and destroy then load the ad
//! and re-check the policy against its author before writing.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use tracing::info;

use crate::domain::ports::{
    AD_PAGE_SIZE, AdPage, AdRepository, AdRepositoryError, AdsCommand, AdsQuery,
    INVALID_PAGE_MESSAGE, ListAdsRequest,
};
use crate::domain::{
    Ad, AdAction, AdContent, AdFilter, AdId, AdListQuery, AdUpdate, Error, NewAd, Policy,
    Requester, UserId,
};

fn map_repository_error(error: AdRepositoryError) -> Error {
    match error {
        AdRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ad repository unavailable: {message}"))
        }
        AdRepositoryError::Query { message } => {
            Error::internal(format!("ad repository error: {message}"))
        }
    }
}

fn ad_not_found(id: AdId) -> Error {
    Error::not_found(format!("ad {id} not found"))
}

/// Ad service implementing [`AdsQuery`] and [`AdsCommand`].
#[derive(Clone)]
pub struct AdsService<R> {
    ads: Arc<R>,
}

impl<R> AdsService<R> {
    /// Create a new service over the ad repository.
    pub fn new(ads: Arc<R>) -> Self {
        Self { ads }
    }
}

impl<R> AdsService<R>
where
    R: AdRepository,
{
    async fn page(
        &self,
        filter: AdFilter,
        author: Option<UserId>,
        page: PageRequest,
    ) -> Result<AdPage, Error> {
        let query = AdListQuery {
            filter,
            author,
            window: page.window(AD_PAGE_SIZE),
        };
        let listing = self.ads.list(&query).await.map_err(map_repository_error)?;
        if page.number() > AD_PAGE_SIZE.page_count(listing.total) {
            return Err(Error::not_found(INVALID_PAGE_MESSAGE));
        }
        Ok(AdPage {
            page,
            size: AD_PAGE_SIZE,
            total: listing.total,
            ads: listing.ads,
        })
    }

    async fn load(&self, id: AdId) -> Result<Ad, Error> {
        self.ads
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| ad_not_found(id))
    }

    async fn load_authorized(
        &self,
        requester: &Requester,
        id: AdId,
        policy: &Policy,
    ) -> Result<Ad, Error> {
        policy.check(requester)?;
        let current = self.load(id).await?;
        policy.check_object(requester, current.author())?;
        Ok(current)
    }
}

#[async_trait]
impl<R> AdsQuery for AdsService<R>
where
    R: AdRepository,
{
    async fn list(&self, request: ListAdsRequest) -> Result<AdPage, Error> {
        AdAction::List.policy().check(&request.requester)?;
        self.page(request.filter, None, request.page).await
    }

    async fn list_mine(&self, request: ListAdsRequest) -> Result<AdPage, Error> {
        AdAction::Me.policy().check(&request.requester)?;
        let author = request.requester.require_user()?.id().clone();
        self.page(request.filter, Some(author), request.page).await
    }

    async fn retrieve(&self, requester: &Requester, id: AdId) -> Result<Ad, Error> {
        AdAction::Retrieve.policy().check(requester)?;
        self.load(id).await
    }
}

#[async_trait]
impl<R> AdsCommand for AdsService<R>
where
    R: AdRepository,
{
    async fn create(&self, requester: &Requester, content: AdContent) -> Result<Ad, Error> {
        AdAction::Create.policy().check(requester)?;
        let author = requester.require_user()?.id().clone();
        let ad = self
            .ads
            .create(&NewAd { author, content })
            .await
            .map_err(map_repository_error)?;
        info!(ad_id = %ad.id(), author = %ad.author(), "ad created");
        Ok(ad)
    }

    async fn update(
        &self,
        requester: &Requester,
        id: AdId,
        update: AdUpdate,
    ) -> Result<Ad, Error> {
        let policy = match update {
            AdUpdate::Replace(_) => AdAction::Update.policy(),
            AdUpdate::Patch(_) => AdAction::PartialUpdate.policy(),
        };
        let current = self.load_authorized(requester, id, &policy).await?;

        let content = update.resolve(current.content());
        self.ads
            .update(id, &content)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| ad_not_found(id))
    }

    async fn authorize(
        &self,
        requester: &Requester,
        id: AdId,
        action: AdAction,
    ) -> Result<(), Error> {
        self.load_authorized(requester, id, &action.policy())
            .await
            .map(|_| ())
    }

    async fn destroy(&self, requester: &Requester, id: AdId) -> Result<(), Error> {
        self.load_authorized(requester, id, &AdAction::Destroy.policy())
            .await?;

        let removed = self.ads.delete(id).await.map_err(map_repository_error)?;
        if !removed {
            return Err(ad_not_found(id));
        }
        info!(ad_id = %id, "ad deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "ads_service_tests.rs"]
mod tests;
