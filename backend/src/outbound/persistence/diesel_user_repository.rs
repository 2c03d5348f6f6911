//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoredUser, UserPersistenceError, UserRepository};
use crate::domain::{PasswordDigest, User, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: &DieselError) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn new_row<'a>(stored: &'a StoredUser, password_hash: &'a str) -> NewUserRow<'a> {
    NewUserRow {
        id: *stored.user.id().as_uuid(),
        username: stored.user.username().as_ref(),
        password_hash,
        is_admin: stored.user.is_admin(),
    }
}

fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let id = UserId::from_uuid(row.id);
    let username = Username::new(row.username.clone())
        .map_err(|err| UserPersistenceError::query(format!("stored username: {err}")))?;
    Ok(if row.is_admin {
        User::admin(id, username)
    } else {
        User::new(id, username)
    })
}

fn row_to_stored_user(row: &UserRow) -> Result<StoredUser, UserPersistenceError> {
    let password = PasswordDigest::parse(&row.password_hash)
        .map_err(|err| UserPersistenceError::query(format!("stored password: {err}")))?;
    Ok(StoredUser {
        user: row_to_user(row)?,
        password,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let password_hash = user.password.encode();

        diesel::insert_into(users::table)
            .values(&new_row(user, &password_hash))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    UserPersistenceError::duplicate_username(user.user.username().as_ref())
                }
                other => map_diesel_error(&other),
            })
    }

    async fn upsert(&self, user: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let password_hash = user.password.encode();

        // The stored id is kept on conflict so existing ads stay attached.
        diesel::insert_into(users::table)
            .values(&new_row(user, &password_hash))
            .on_conflict(users::username)
            .do_update()
            .set((
                users::password_hash.eq(excluded(users::password_hash)),
                users::is_admin.eq(excluded(users::is_admin)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(&err))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        row.as_ref().map(row_to_stored_user).transpose()
    }
}
