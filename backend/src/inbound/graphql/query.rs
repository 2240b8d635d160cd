//! Query root.

use async_graphql::{Context, Object, Result};

use crate::domain::{PostId, UserId};

use super::types::{ActivityObject, CommentObject, PostObject, UserObject};
use super::{queries, to_graphql_error, viewer};

fn collect<T, O: From<T>>(items: Vec<T>) -> Vec<O> {
    items.into_iter().map(O::from).collect()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn all_users(&self, ctx: &Context<'_>) -> Result<Vec<UserObject>> {
        let users = queries(ctx)?.all_users().await.map_err(to_graphql_error)?;
        Ok(collect(users))
    }

    async fn user_by_id(&self, ctx: &Context<'_>, id: i32) -> Result<UserObject> {
        let user = queries(ctx)?
            .user_by_id(UserId::new(id))
            .await
            .map_err(to_graphql_error)?;
        Ok(user.into())
    }

    async fn user_by_username(&self, ctx: &Context<'_>, username: String) -> Result<UserObject> {
        let user = queries(ctx)?
            .user_by_username(&username)
            .await
            .map_err(to_graphql_error)?;
        Ok(user.into())
    }

    async fn all_posts(&self, ctx: &Context<'_>) -> Result<Vec<PostObject>> {
        let posts = queries(ctx)?
            .all_posts(viewer(ctx))
            .await
            .map_err(to_graphql_error)?;
        Ok(collect(posts))
    }

    async fn post_by_id(&self, ctx: &Context<'_>, id: i32) -> Result<PostObject> {
        let post = queries(ctx)?
            .post_by_id(PostId::new(id), viewer(ctx))
            .await
            .map_err(to_graphql_error)?;
        Ok(post.into())
    }

    async fn posts_by_author(&self, ctx: &Context<'_>, author_id: i32) -> Result<Vec<PostObject>> {
        let posts = queries(ctx)?
            .posts_by_author(UserId::new(author_id), viewer(ctx))
            .await
            .map_err(to_graphql_error)?;
        Ok(collect(posts))
    }

    async fn all_comments(&self, ctx: &Context<'_>) -> Result<Vec<CommentObject>> {
        let comments = queries(ctx)?
            .all_comments(viewer(ctx))
            .await
            .map_err(to_graphql_error)?;
        Ok(collect(comments))
    }

    async fn comments_by_post(
        &self,
        ctx: &Context<'_>,
        post_id: i32,
    ) -> Result<Vec<CommentObject>> {
        let comments = queries(ctx)?
            .comments_by_post(PostId::new(post_id), viewer(ctx))
            .await
            .map_err(to_graphql_error)?;
        Ok(collect(comments))
    }

    async fn all_activities(&self, ctx: &Context<'_>) -> Result<Vec<ActivityObject>> {
        let activities = queries(ctx)?
            .all_activities()
            .await
            .map_err(to_graphql_error)?;
        Ok(collect(activities))
    }
}
