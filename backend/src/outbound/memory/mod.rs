//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and by HTTP tests. State lives
//! behind a single `tokio::sync::RwLock`, so each operation observes and
//! mutates a consistent snapshot. Nothing survives a restart.
//!
//! Identifiers are assigned from per-collection counters and never reused.
//! Deleting an ad removes its comments, matching the database cascade.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::ports::{
    AdRepository, AdRepositoryError, CommentRepository, CommentRepositoryError, StoredUser,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Ad, AdContent, AdId, AdListQuery, AdListing, Comment, CommentId, CommentText, NewAd,
    NewComment, User, UserId,
};

#[derive(Debug, Default)]
struct State {
    users: Vec<StoredUser>,
    ads: BTreeMap<AdId, Ad>,
    comments: BTreeMap<CommentId, Comment>,
    last_ad_id: i64,
    last_comment_id: i64,
}

/// Shared in-memory store for users, ads and comments.
///
/// # Examples
/// ```
/// use skymarket::outbound::memory::MemoryStore;
///
/// let store = MemoryStore::default();
/// # let _ = store;
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

fn window_bounds(offset: u64, limit: u64) -> (usize, usize) {
    (
        usize::try_from(offset).unwrap_or(usize::MAX),
        usize::try_from(limit).unwrap_or(usize::MAX),
    )
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut state = self.state.write().await;
        let username = user.user.username().as_ref();
        if state
            .users
            .iter()
            .any(|stored| stored.user.username().as_ref() == username)
        {
            return Err(UserPersistenceError::duplicate_username(username));
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn upsert(&self, user: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut state = self.state.write().await;
        let username = user.user.username().as_ref();
        match state
            .users
            .iter_mut()
            .find(|stored| stored.user.username().as_ref() == username)
        {
            Some(existing) => *existing = user.clone(),
            None => state.users.push(user.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.username().as_ref() == username)
            .cloned())
    }
}

#[async_trait]
impl AdRepository for MemoryStore {
    async fn create(&self, ad: &NewAd) -> Result<Ad, AdRepositoryError> {
        let mut state = self.state.write().await;
        let next = state.last_ad_id.saturating_add(1);
        let id = AdId::new(next).map_err(|err| AdRepositoryError::query(err.to_string()))?;
        state.last_ad_id = next;
        let stored = Ad::new(id, ad.author.clone(), ad.content.clone(), Utc::now());
        state.ads.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: AdId) -> Result<Option<Ad>, AdRepositoryError> {
        Ok(self.state.read().await.ads.get(&id).cloned())
    }

    async fn list(&self, query: &AdListQuery) -> Result<AdListing, AdRepositoryError> {
        let state = self.state.read().await;
        let matching: Vec<&Ad> = state
            .ads
            .values()
            .filter(|ad| query.author.as_ref().is_none_or(|author| ad.author() == author))
            .filter(|ad| query.filter.matches(ad))
            .collect();
        let (skip, take) = window_bounds(query.window.offset(), query.window.limit());
        Ok(AdListing {
            total: u64::try_from(matching.len()).unwrap_or(u64::MAX),
            ads: matching.into_iter().skip(skip).take(take).cloned().collect(),
        })
    }

    async fn update(
        &self,
        id: AdId,
        content: &AdContent,
    ) -> Result<Option<Ad>, AdRepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.ads.get_mut(&id).map(|ad| {
            *ad = ad.with_content(content.clone());
            ad.clone()
        }))
    }

    async fn delete(&self, id: AdId) -> Result<bool, AdRepositoryError> {
        let mut state = self.state.write().await;
        let removed = state.ads.remove(&id).is_some();
        if removed {
            state.comments.retain(|_, comment| comment.ad() != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut state = self.state.write().await;
        if !state.ads.contains_key(&comment.ad) {
            return Err(CommentRepositoryError::missing_ad(comment.ad.get()));
        }
        let next = state.last_comment_id.saturating_add(1);
        let id =
            CommentId::new(next).map_err(|err| CommentRepositoryError::query(err.to_string()))?;
        state.last_comment_id = next;
        let stored = Comment::new(
            id,
            comment.ad,
            comment.author.clone(),
            comment.text.clone(),
            Utc::now(),
        );
        state.comments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        Ok(self.state.read().await.comments.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Comment>, CommentRepositoryError> {
        Ok(self.state.read().await.comments.values().cloned().collect())
    }

    async fn update_text(
        &self,
        id: CommentId,
        text: &CommentText,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.comments.get_mut(&id).map(|comment| {
            *comment = comment.with_text(text.clone());
            comment.clone()
        }))
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError> {
        Ok(self.state.write().await.comments.remove(&id).is_some())
    }
}
