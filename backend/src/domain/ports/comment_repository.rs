//! Port for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, CommentText, NewComment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The parent ad disappeared before the insert landed.
        MissingAd { ad_id: i64 } => "ad {ad_id} does not exist",
    }
}

/// Port for storing and querying comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment, assigning its id and creation time.
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError>;

    /// Find a comment by id.
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Every comment in insertion order.
    async fn list(&self) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Replace a comment's text. `None` when the comment is gone.
    async fn update_text(
        &self,
        id: CommentId,
        text: &CommentText,
    ) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Delete a comment. Returns whether a row was removed.
    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError>;
}
