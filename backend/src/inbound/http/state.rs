//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, AdRepository, AdsCommand, AdsQuery, CommentRepository, CommentsCommand,
    CommentsQuery, LoginService, UserProfileQuery, UserRepository,
};
use crate::domain::{AccountsService, AdsService, CommentsService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountsCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub ads: Arc<dyn AdsQuery>,
    pub ads_command: Arc<dyn AdsCommand>,
    pub comments: Arc<dyn CommentsQuery>,
    pub comments_command: Arc<dyn CommentsCommand>,
}

impl HttpState {
    /// Wire every port to the domain services built over the given
    /// repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use skymarket::inbound::http::state::HttpState;
    /// use skymarket::outbound::memory::MemoryStore;
    ///
    /// let store = Arc::new(MemoryStore::default());
    /// let state = HttpState::from_repositories(store.clone(), store.clone(), store);
    /// let _login = state.login.clone();
    /// ```
    pub fn from_repositories<U, A, C>(users: Arc<U>, ads: Arc<A>, comments: Arc<C>) -> Self
    where
        U: UserRepository + 'static,
        A: AdRepository + 'static,
        C: CommentRepository + 'static,
    {
        let accounts = Arc::new(AccountsService::new(users));
        let ads_service = Arc::new(AdsService::new(ads.clone()));
        let comments_service = Arc::new(CommentsService::new(comments, ads));
        Self {
            login: accounts.clone(),
            accounts: accounts.clone(),
            profile: accounts,
            ads: ads_service.clone(),
            ads_command: ads_service,
            comments: comments_service.clone(),
            comments_command: comments_service,
        }
    }
}
