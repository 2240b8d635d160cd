//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `username` and `email` are unique.
    users (id) {
        id -> Int4,
        username -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string; never selected outside the login lookup.
        password_hash -> Varchar,
        /// `user` or `admin`, enforced by `users_role_check`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    posts (id) {
        id -> Int4,
        title -> Varchar,
        content -> Text,
        author_id -> Int4,
        created_at -> Timestamptz,
        is_public -> Bool,
    }
}

diesel::table! {
    comments (id) {
        id -> Int4,
        content -> Text,
        post_id -> Int4,
        author_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only activity log.
    activities (id) {
        id -> Int4,
        action -> Varchar,
        details -> Text,
        timestamp -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(comments -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(users, posts, comments, activities);
