//! Comment domain service.
//!
//! Every comment action only requires an authenticated requester. Creation
//! resolves the parent ad first so comments never point at a missing ad.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AdRepository, AdRepositoryError, CommentRepository, CommentRepositoryError, CommentsCommand,
    CommentsQuery,
};
use crate::domain::{
    AdId, Comment, CommentAction, CommentId, CommentText, Error, NewComment, Requester,
};

fn map_repository_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentRepositoryError::MissingAd { ad_id } => {
            Error::not_found(format!("ad {ad_id} not found"))
        }
    }
}

fn map_ad_repository_error(error: AdRepositoryError) -> Error {
    match error {
        AdRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ad repository unavailable: {message}"))
        }
        AdRepositoryError::Query { message } => {
            Error::internal(format!("ad repository error: {message}"))
        }
    }
}

fn comment_not_found(id: CommentId) -> Error {
    Error::not_found(format!("comment {id} not found"))
}

/// Comment service implementing [`CommentsQuery`] and [`CommentsCommand`].
#[derive(Clone)]
pub struct CommentsService<C, A> {
    comments: Arc<C>,
    ads: Arc<A>,
}

impl<C, A> CommentsService<C, A> {
    /// Create a new service over the comment and ad repositories.
    pub fn new(comments: Arc<C>, ads: Arc<A>) -> Self {
        Self { comments, ads }
    }
}

impl<C, A> CommentsService<C, A>
where
    C: CommentRepository,
{
    async fn load(&self, id: CommentId) -> Result<Comment, Error> {
        self.comments
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| comment_not_found(id))
    }
}

#[async_trait]
impl<C, A> CommentsQuery for CommentsService<C, A>
where
    C: CommentRepository,
    A: AdRepository,
{
    async fn list(&self, requester: &Requester) -> Result<Vec<Comment>, Error> {
        CommentAction::List.policy().check(requester)?;
        self.comments.list().await.map_err(map_repository_error)
    }

    async fn retrieve(&self, requester: &Requester, id: CommentId) -> Result<Comment, Error> {
        CommentAction::Retrieve.policy().check(requester)?;
        self.load(id).await
    }
}

#[async_trait]
impl<C, A> CommentsCommand for CommentsService<C, A>
where
    C: CommentRepository,
    A: AdRepository,
{
    async fn create(
        &self,
        requester: &Requester,
        ad: AdId,
        text: CommentText,
    ) -> Result<Comment, Error> {
        CommentAction::Create.policy().check(requester)?;
        let author = requester.require_user()?.id().clone();
        let parent = self
            .ads
            .find_by_id(ad)
            .await
            .map_err(map_ad_repository_error)?
            .ok_or_else(|| Error::not_found(format!("ad {ad} not found")))?;

        let comment = self
            .comments
            .create(&NewComment {
                ad: parent.id(),
                author,
                text,
            })
            .await
            .map_err(map_repository_error)?;
        info!(comment_id = %comment.id(), ad_id = %comment.ad(), "comment created");
        Ok(comment)
    }

    async fn update(
        &self,
        requester: &Requester,
        id: CommentId,
        text: Option<CommentText>,
    ) -> Result<Comment, Error> {
        let action = if text.is_some() {
            CommentAction::Update
        } else {
            CommentAction::PartialUpdate
        };
        action.policy().check(requester)?;
        let Some(text) = text else {
            return self.load(id).await;
        };
        self.comments
            .update_text(id, &text)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| comment_not_found(id))
    }

    async fn destroy(&self, requester: &Requester, id: CommentId) -> Result<(), Error> {
        CommentAction::Destroy.policy().check(requester)?;
        let removed = self
            .comments
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(comment_not_found(id))
        }
    }
}

#[cfg(test)]
#[path = "comments_service_tests.rs"]
mod tests;
