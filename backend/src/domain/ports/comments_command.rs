//! Driving port for comment mutations.

use async_trait::async_trait;

use crate::domain::{AdId, Comment, CommentId, CommentText, Error, Requester};

/// Domain use-case port for writing comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsCommand: Send + Sync {
    /// Attach a comment by the requester to ad `ad`.
    async fn create(
        &self,
        requester: &Requester,
        ad: AdId,
        text: CommentText,
    ) -> Result<Comment, Error>;

    /// Change a comment's text; `None` leaves it as is.
    async fn update(
        &self,
        requester: &Requester,
        id: CommentId,
        text: Option<CommentText>,
    ) -> Result<Comment, Error>;

    /// Delete a comment.
    async fn destroy(&self, requester: &Requester, id: CommentId) -> Result<(), Error>;
}
