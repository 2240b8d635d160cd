//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion into domain records re-runs the
//! domain validation, so a row that violates an invariant surfaces as a query
//! error instead of leaking through.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Activity, ActivityAction, ActivityId, Comment, CommentId, ContentBody, EmailAddress,
    PasswordHash, Post, PostId, PostTitle, Role, User, UserCredential, UserId, Username,
};

use super::schema::{activities, comments, posts, users};

/// Public columns of the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(row.id),
            username: Username::new(&row.username).map_err(|err| err.to_string())?,
            email: EmailAddress::new(&row.email).map_err(|err| err.to_string())?,
            role: row.role.parse::<Role>().map_err(|err| err.to_string())?,
            created_at: row.created_at,
        })
    }
}

/// Users row including the stored hash, used only by the login lookup.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

impl TryFrom<CredentialRow> for UserCredential {
    type Error = String;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user: User::try_from(row.user)?,
            password_hash: PasswordHash::from_phc(row.password_hash),
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
}

impl TryFrom<PostRow> for Post {
    type Error = String;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PostId::new(row.id),
            title: PostTitle::new(&row.title).map_err(|err| err.to_string())?,
            content: ContentBody::new(row.content).map_err(|err| err.to_string())?,
            author_id: UserId::new(row.author_id),
            created_at: row.created_at,
            is_public: row.is_public,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub author_id: i32,
    pub is_public: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i32,
    pub content: String,
    pub post_id: i32,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = String;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommentId::new(row.id),
            content: ContentBody::new(row.content).map_err(|err| err.to_string())?,
            post_id: PostId::new(row.post_id),
            author_id: UserId::new(row.author_id),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub content: &'a str,
    pub post_id: i32,
    pub author_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ActivityRow {
    pub id: i32,
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = String;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActivityId::new(row.id),
            action: ActivityAction::new(&row.action).map_err(|err| err.to_string())?,
            details: row.details,
            timestamp: row.timestamp,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activities)]
pub(crate) struct NewActivityRow<'a> {
    pub action: &'a str,
    pub details: &'a str,
}

/// Convert a batch of rows, failing on the first invalid one.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, String>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter().map(T::try_from).collect()
}
