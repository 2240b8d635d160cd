//! Mutation root.

use async_graphql::{Context, Object, Result};

use crate::domain::{
    CreateCommentRequest, CreatePostRequest, CreateUserRequest, LogActivityRequest, PostId,
};

use super::types::{ActivityObject, CommentObject, PostObject, UserObject};
use super::{mutations, to_graphql_error, viewer};

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register an account. Only admins may create admins.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
        role: Option<String>,
    ) -> Result<UserObject> {
        let request = CreateUserRequest {
            username,
            email,
            password,
            role,
        };
        let user = mutations(ctx)?
            .create_user(request, viewer(ctx))
            .await
            .map_err(to_graphql_error)?;
        Ok(user.into())
    }

    /// Publish a post as the signed-in user.
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        title: String,
        content: String,
        is_public: Option<bool>,
    ) -> Result<PostObject> {
        let request = CreatePostRequest {
            title,
            content,
            is_public,
        };
        let post = mutations(ctx)?
            .create_post(request, viewer(ctx))
            .await
            .map_err(to_graphql_error)?;
        Ok(post.into())
    }

    /// Comment on a visible post as the signed-in user.
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        content: String,
        post_id: i32,
    ) -> Result<CommentObject> {
        let request = CreateCommentRequest {
            content,
            post_id: PostId::new(post_id),
        };
        let comment = mutations(ctx)?
            .create_comment(request, viewer(ctx))
            .await
            .map_err(to_graphql_error)?;
        Ok(comment.into())
    }

    async fn log_activity(
        &self,
        ctx: &Context<'_>,
        action: String,
        details: String,
    ) -> Result<ActivityObject> {
        let activity = mutations(ctx)?
            .log_activity(LogActivityRequest { action, details })
            .await
            .map_err(to_graphql_error)?;
        Ok(activity.into())
    }
}
