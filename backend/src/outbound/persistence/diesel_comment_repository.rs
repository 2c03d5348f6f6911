//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{AdId, Comment, CommentId, CommentText, NewComment, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::comments;

/// Postgres' default name for the `comments.ad_id` foreign key.
const AD_FOREIGN_KEY: &str = "comments_ad_id_fkey";

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    map_basic_pool_error(error, CommentRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> CommentRepositoryError {
    map_basic_diesel_error(
        &error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

fn is_missing_ad(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)
            if info.constraint_name() == Some(AD_FOREIGN_KEY)
    )
}

fn row_to_comment(row: CommentRow) -> Result<Comment, CommentRepositoryError> {
    let corrupt =
        |err: String| CommentRepositoryError::query(format!("stored comment is invalid: {err}"));
    Ok(Comment::new(
        CommentId::new(row.id).map_err(|err| corrupt(err.to_string()))?,
        AdId::new(row.ad_id).map_err(|err| corrupt(err.to_string()))?,
        UserId::from_uuid(row.author_id),
        CommentText::new(&row.text).map_err(|err| corrupt(err.to_string()))?,
        row.created_at,
    ))
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            ad_id: comment.ad.get(),
            author_id: *comment.author.as_uuid(),
            text: comment.text.as_ref(),
        };

        let stored = diesel::insert_into(comments::table)
            .values(&row)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_missing_ad(&err) {
                    CommentRepositoryError::missing_ad(comment.ad.get())
                } else {
                    map_diesel_error(err)
                }
            })?;
        row_to_comment(stored)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = comments::table
            .find(id.get())
            .select(CommentRow::as_select())
            .first::<CommentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_comment).transpose()
    }

    async fn list(&self) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CommentRow> = comments::table
            .order(comments::id.asc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_comment).collect()
    }

    async fn update_text(
        &self,
        id: CommentId,
        text: &CommentText,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(comments::table.find(id.get()))
            .set(comments::text.eq(text.as_ref()))
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_comment).transpose()
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(comments::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;
    use uuid::Uuid;

    struct Violation(Option<&'static str>);

    impl DatabaseErrorInformation for Violation {
        fn message(&self) -> &str {
            "insert or update violates foreign key constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("comments")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn fk_violation(constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new(Violation(constraint)),
        )
    }

    #[rstest]
    #[case(Some(AD_FOREIGN_KEY), true)]
    #[case(Some("comments_author_id_fkey"), false)]
    #[case(None, false)]
    fn only_the_ad_foreign_key_means_missing_ad(
        #[case] constraint: Option<&'static str>,
        #[case] expected: bool,
    ) {
        assert_eq!(is_missing_ad(&fk_violation(constraint)), expected);
    }

    #[rstest]
    fn rows_convert_to_comments() {
        let comment = row_to_comment(CommentRow {
            id: 4,
            ad_id: 2,
            author_id: Uuid::nil(),
            text: "Still for sale?".to_owned(),
            created_at: Utc::now(),
        })
        .expect("valid row");
        assert_eq!(comment.id().get(), 4);
        assert_eq!(comment.ad().get(), 2);
    }

    #[rstest]
    fn blank_stored_text_is_a_query_error() {
        let err = row_to_comment(CommentRow {
            id: 4,
            ad_id: 2,
            author_id: Uuid::nil(),
            text: "   ".to_owned(),
            created_at: Utc::now(),
        })
        .expect_err("blank text");
        assert!(matches!(err, CommentRepositoryError::Query { .. }));
    }
}
