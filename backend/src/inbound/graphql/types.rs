//! GraphQL object types mirroring the domain records.
//!
//! Relationship fields resolve through the query service, so visibility
//! rules apply at every nesting level.

use async_graphql::{ComplexObject, Context, Result, SimpleObject};
use chrono::{DateTime, Utc};

use crate::domain::{Activity, Comment, Post, PostId, User, UserId};

use super::{queries, viewer};

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User", complex)]
pub struct UserObject {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserObject {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            username: user.username.into(),
            email: user.email.into(),
            role: user.role.as_str().to_owned(),
            created_at: user.created_at,
        }
    }
}

#[ComplexObject]
impl UserObject {
    /// Posts by this user that the caller may see.
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostObject>> {
        let posts = queries(ctx)?
            .posts_by_author(UserId::new(self.id), viewer(ctx))
            .await
            .map_err(super::to_graphql_error)?;
        Ok(posts.into_iter().map(PostObject::from).collect())
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Post", complex)]
pub struct PostObject {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
}

impl From<Post> for PostObject {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.get(),
            title: post.title.as_ref().to_owned(),
            content: post.content.as_ref().to_owned(),
            author_id: post.author_id.get(),
            created_at: post.created_at,
            is_public: post.is_public,
        }
    }
}

#[ComplexObject]
impl PostObject {
    async fn author(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let user = queries(ctx)?
            .user_by_id(UserId::new(self.author_id))
            .await
            .map_err(super::to_graphql_error)?;
        Ok(user.into())
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<CommentObject>> {
        let comments = queries(ctx)?
            .comments_by_post(PostId::new(self.id), viewer(ctx))
            .await
            .map_err(super::to_graphql_error)?;
        Ok(comments.into_iter().map(CommentObject::from).collect())
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Comment", complex)]
pub struct CommentObject {
    pub id: i32,
    pub content: String,
    pub post_id: i32,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentObject {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.get(),
            content: comment.content.as_ref().to_owned(),
            post_id: comment.post_id.get(),
            author_id: comment.author_id.get(),
            created_at: comment.created_at,
        }
    }
}

#[ComplexObject]
impl CommentObject {
    async fn author(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let user = queries(ctx)?
            .user_by_id(UserId::new(self.author_id))
            .await
            .map_err(super::to_graphql_error)?;
        Ok(user.into())
    }

    async fn post(&self, ctx: &Context<'_>) -> Result<PostObject> {
        let post = queries(ctx)?
            .post_by_id(PostId::new(self.post_id), viewer(ctx))
            .await
            .map_err(super::to_graphql_error)?;
        Ok(post.into())
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Activity")]
pub struct ActivityObject {
    pub id: i32,
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Activity> for ActivityObject {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id.get(),
            action: activity.action.as_ref().to_owned(),
            details: activity.details,
            timestamp: activity.timestamp,
        }
    }
}
