//! PostgreSQL-backed `AdRepository` implementation using Diesel ORM.
//!
//! Listing applies the filter in SQL: `ILIKE` for the title substring,
//! equality for the category and inclusive bounds for the price. The same
//! boxed predicate drives both the `COUNT(*)` and the windowed page query.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AdRepository, AdRepositoryError};
use crate::domain::{
    Ad, AdContent, AdDescription, AdId, AdListQuery, AdListing, AdTitle, Category, NewAd, Price,
    UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AdRow, AdUpdate, NewAdRow};
use super::pool::{DbPool, PoolError};
use super::schema::ads;

/// Diesel-backed implementation of the ad repository port.
#[derive(Clone)]
pub struct DieselAdRepository {
    pool: DbPool,
}

impl DieselAdRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AdRepositoryError {
    map_basic_pool_error(error, AdRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AdRepositoryError {
    map_basic_diesel_error(&error, AdRepositoryError::query, AdRepositoryError::connection)
}

fn corrupt(err: impl std::fmt::Display) -> AdRepositoryError {
    AdRepositoryError::query(format!("stored ad is invalid: {err}"))
}

fn row_to_ad(row: AdRow) -> Result<Ad, AdRepositoryError> {
    let content = AdContent {
        title: AdTitle::new(&row.title).map_err(corrupt)?,
        description: AdDescription::new(&row.description).map_err(corrupt)?,
        price: Price::new(row.price).map_err(corrupt)?,
        category: Category::new(&row.category).map_err(corrupt)?,
    };
    Ok(Ad::new(
        AdId::new(row.id).map_err(corrupt)?,
        UserId::from_uuid(row.author_id),
        content,
        row.created_at,
    ))
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len().saturating_add(2));
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn filtered(query: &AdListQuery) -> ads::BoxedQuery<'static, Pg> {
    let mut statement = ads::table.into_boxed();
    if let Some(author) = &query.author {
        statement = statement.filter(ads::author_id.eq(*author.as_uuid()));
    }
    if let Some(title) = query.filter.title() {
        statement = statement.filter(ads::title.ilike(like_pattern(title)));
    }
    if let Some(category) = query.filter.category() {
        statement = statement.filter(ads::category.eq(category.to_owned()));
    }
    if let Some(min) = query.filter.price_min() {
        statement = statement.filter(ads::price.ge(min.get()));
    }
    if let Some(max) = query.filter.price_max() {
        statement = statement.filter(ads::price.le(max.get()));
    }
    statement
}

#[async_trait]
impl AdRepository for DieselAdRepository {
    async fn create(&self, ad: &NewAd) -> Result<Ad, AdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let content = &ad.content;
        let row = NewAdRow {
            author_id: *ad.author.as_uuid(),
            title: content.title.as_ref(),
            description: content.description.as_ref(),
            price: content.price.get(),
            category: content.category.as_ref(),
        };

        let stored = diesel::insert_into(ads::table)
            .values(&row)
            .returning(AdRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_ad(stored)
    }

    async fn find_by_id(&self, id: AdId) -> Result<Option<Ad>, AdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = ads::table
            .find(id.get())
            .select(AdRow::as_select())
            .first::<AdRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_ad).transpose()
    }

    async fn list(&self, query: &AdListQuery) -> Result<AdListing, AdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<AdRow> = filtered(query)
            .order(ads::id.asc())
            .offset(i64::try_from(query.window.offset()).unwrap_or(i64::MAX))
            .limit(i64::try_from(query.window.limit()).unwrap_or(i64::MAX))
            .select(AdRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(AdListing {
            total: u64::try_from(total).unwrap_or_default(),
            ads: rows.into_iter().map(row_to_ad).collect::<Result<_, _>>()?,
        })
    }

    async fn update(
        &self,
        id: AdId,
        content: &AdContent,
    ) -> Result<Option<Ad>, AdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = AdUpdate {
            title: content.title.as_ref(),
            description: content.description.as_ref(),
            price: content.price.get(),
            category: content.category.as_ref(),
        };

        let row = diesel::update(ads::table.find(id.get()))
            .set(&changes)
            .returning(AdRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_ad).transpose()
    }

    async fn delete(&self, id: AdId) -> Result<bool, AdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(ads::table.find(id.get()))
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
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case("bike", "%bike%")]
    #[case("50%_off", "%50\\%\\_off%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn like_patterns_escape_metacharacters(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(needle), expected);
    }

    fn row(price: i64) -> AdRow {
        AdRow {
            id: 3,
            author_id: Uuid::nil(),
            title: "Kayak".to_owned(),
            description: String::new(),
            price,
            category: "water".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn rows_convert_to_ads() {
        let ad = row_to_ad(row(120)).expect("valid row");
        assert_eq!(ad.id().get(), 3);
        assert_eq!(ad.content().price.get(), 120);
        assert_eq!(ad.author(), &UserId::from_uuid(Uuid::nil()));
    }

    #[rstest]
    fn corrupt_rows_are_query_errors() {
        let err = row_to_ad(row(-1)).expect_err("negative price");
        assert!(matches!(err, AdRepositoryError::Query { .. }));
    }
}
