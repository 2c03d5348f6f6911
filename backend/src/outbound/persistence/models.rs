//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{ads, comments, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
}

/// Row struct for reading from the ads table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdRow {
    pub id: i64,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new ads; `id` and `created_at` come from column
/// defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ads)]
pub(crate) struct NewAdRow<'a> {
    pub author_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub price: i64,
    pub category: &'a str,
}

/// Changeset for the writable ad columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = ads)]
pub(crate) struct AdUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub price: i64,
    pub category: &'a str,
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub ad_id: i64,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new comments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub ad_id: i64,
    pub author_id: Uuid,
    pub text: &'a str,
}
