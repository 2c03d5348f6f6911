//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        #[max_length = 150]
        username -> Varchar,
        /// `sha256$<salt>$<digest>`.
        password_hash -> Text,
        is_admin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Classified ads; `id` is a `BIGSERIAL`.
    ads (id) {
        id -> Int8,
        author_id -> Uuid,
        #[max_length = 200]
        title -> Varchar,
        #[max_length = 1000]
        description -> Varchar,
        price -> Int8,
        #[max_length = 64]
        category -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments on ads; rows cascade when the parent ad is deleted.
    comments (id) {
        id -> Int8,
        ad_id -> Int8,
        author_id -> Uuid,
        #[max_length = 1000]
        text -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(ads -> users (author_id));
diesel::joinable!(comments -> ads (ad_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, ads, comments);
