//! Builders for HTTP state over the configured store.

use std::sync::Arc;

use actix_web::web;

use skymarket::domain::ports::UserRepository;
use skymarket::domain::{AccountsService, Error};
use skymarket::inbound::http::state::HttpState;
use skymarket::outbound::memory::MemoryStore;
use skymarket::outbound::persistence::{
    DbPool, DieselAdRepository, DieselCommentRepository, DieselUserRepository,
};
use tracing::info;

use super::config::AdminBootstrap;

/// Repositories backing one process.
pub(crate) enum Store {
    Postgres(DbPool),
    Memory(Arc<MemoryStore>),
}

impl Store {
    pub(crate) fn from_pool(pool: Option<DbPool>) -> Self {
        match pool {
            Some(pool) => Self::Postgres(pool),
            None => {
                info!("no database configured; data lives in memory");
                Self::Memory(Arc::new(MemoryStore::default()))
            }
        }
    }

    /// Wire every HTTP port over this store.
    pub(crate) fn http_state(&self) -> web::Data<HttpState> {
        let state = match self {
            Self::Postgres(pool) => HttpState::from_repositories(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselAdRepository::new(pool.clone())),
                Arc::new(DieselCommentRepository::new(pool.clone())),
            ),
            Self::Memory(store) => {
                HttpState::from_repositories(store.clone(), store.clone(), store.clone())
            }
        };
        web::Data::new(state)
    }

    /// Create or promote the configured administrator.
    ///
    /// # Errors
    ///
    /// Propagates invalid usernames and repository failures.
    pub(crate) async fn ensure_admin(&self, admin: &AdminBootstrap) -> Result<(), Error> {
        match self {
            Self::Postgres(pool) => {
                ensure_admin_with(Arc::new(DieselUserRepository::new(pool.clone())), admin).await
            }
            Self::Memory(store) => ensure_admin_with(store.clone(), admin).await,
        }
    }
}

async fn ensure_admin_with<U>(users: Arc<U>, admin: &AdminBootstrap) -> Result<(), Error>
where
    U: UserRepository,
{
    AccountsService::new(users)
        .ensure_admin(&admin.username, &admin.password)
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use skymarket::domain::LoginCredentials;

    fn admin() -> AdminBootstrap {
        AdminBootstrap {
            username: "root".to_owned(),
            password: "correct-horse-battery".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn memory_admin_can_log_in_through_http_state() {
        let store = Store::from_pool(None);
        store.ensure_admin(&admin()).await.expect("admin ensured");

        let state = store.http_state();
        let credentials = LoginCredentials::try_from_parts("root", "correct-horse-battery")
            .expect("credentials shape");
        let id = state
            .login
            .authenticate(&credentials)
            .await
            .expect("admin authenticates");
        let user = state
            .profile
            .find_user(&id)
            .await
            .expect("profile lookup")
            .expect("admin exists");
        assert!(user.is_admin());
    }

    #[rstest]
    #[tokio::test]
    async fn ensuring_twice_is_idempotent() {
        let store = Store::from_pool(None);
        store.ensure_admin(&admin()).await.expect("first");
        store.ensure_admin(&admin()).await.expect("second");

        let Store::Memory(memory) = &store else {
            panic!("expected memory store");
        };
        let found = memory
            .find_by_username("root")
            .await
            .expect("lookup")
            .expect("admin stored");
        assert!(found.user.is_admin());
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_admin_username_is_rejected() {
        let store = Store::from_pool(None);
        let bad = AdminBootstrap {
            username: "no spaces allowed".to_owned(),
            password: "correct-horse-battery".to_owned(),
        };
        assert!(store.ensure_admin(&bad).await.is_err());
    }
}
