//! Driving port for comment reads.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, Error, Requester};

/// Domain use-case port for reading comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsQuery: Send + Sync {
    /// Every comment, regardless of parent ad.
    async fn list(&self, requester: &Requester) -> Result<Vec<Comment>, Error>;

    /// Fetch one comment.
    async fn retrieve(&self, requester: &Requester, id: CommentId) -> Result<Comment, Error>;
}
