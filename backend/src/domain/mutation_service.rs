//! Write-side resolution: validated inserts behind named mutations.
//!
//! Requests arrive as raw strings from transports; every field is validated
//! into a domain value before any repository call, so a rejected request
//! never touches storage.

use std::sync::Arc;

use tracing::info;

use super::hashing::hash_password;
use super::ports::{PasswordHasher, Storage};
use super::repository_errors::{
    map_activity_error, map_comment_error, map_post_error, map_user_error,
};
use super::{
    Activity, ActivityAction, Comment, ContentBody, EmailAddress, Error, NewActivity, NewComment,
    NewPost, NewUser, Password, Post, PostId, PostTitle, Role, User, Username, Viewer,
};

/// Raw input for `createUser`.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// Raw input for `createPost`.
#[derive(Debug, Clone)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub is_public: Option<bool>,
}

/// Raw input for `createComment`.
#[derive(Debug, Clone)]
pub struct CreateCommentRequest {
    pub content: String,
    pub post_id: PostId,
}

/// Raw input for `logActivity`.
#[derive(Debug, Clone)]
pub struct LogActivityRequest {
    pub action: String,
    pub details: String,
}

/// Mutation resolver backed by the storage ports.
#[derive(Clone)]
pub struct MutationService {
    storage: Storage,
    hasher: Arc<dyn PasswordHasher>,
}

fn require_viewer(viewer: Option<&Viewer>) -> Result<&Viewer, Error> {
    viewer.ok_or_else(|| Error::unauthorized("login required"))
}

impl MutationService {
    pub fn new(storage: Storage, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { storage, hasher }
    }

    /// Register an account.
    ///
    /// Anyone may create a `user`; only admins may create another `admin`.
    pub async fn create_user(
        &self,
        request: CreateUserRequest,
        viewer: Option<&Viewer>,
    ) -> Result<User, Error> {
        let invalid = |err: super::UserValidationError| {
            Error::invalid_field(err.field(), err.to_string())
        };
        let username = Username::new(&request.username).map_err(invalid)?;
        let email = EmailAddress::new(&request.email).map_err(invalid)?;
        let role = match request.role.as_deref() {
            Some(raw) => raw.parse::<Role>().map_err(invalid)?,
            None => Role::User,
        };
        let password = Password::new(&request.password)
            .map_err(|err| Error::invalid_field("password", err.to_string()))?;

        if role == Role::Admin && !viewer.is_some_and(Viewer::is_admin) {
            return Err(Error::forbidden("only admins may create admin accounts"));
        }

        let password_hash = hash_password(self.hasher.clone(), password).await?;
        let user = self
            .storage
            .users
            .create(&NewUser {
                username,
                email,
                password_hash,
                role,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    /// Publish a post authored by the caller.
    pub async fn create_post(
        &self,
        request: CreatePostRequest,
        viewer: Option<&Viewer>,
    ) -> Result<Post, Error> {
        let viewer = require_viewer(viewer)?;
        let invalid =
            |err: super::PostValidationError| Error::invalid_field(err.field(), err.to_string());
        let title = PostTitle::new(&request.title).map_err(invalid)?;
        let content = ContentBody::new(request.content).map_err(invalid)?;

        let post = self
            .storage
            .posts
            .create(&NewPost {
                title,
                content,
                author_id: viewer.id(),
                is_public: request.is_public.unwrap_or(true),
            })
            .await
            .map_err(map_post_error)?;
        info!(post_id = %post.id, author_id = %post.author_id, is_public = post.is_public, "post created");
        Ok(post)
    }

    /// Comment on a post the caller can see.
    pub async fn create_comment(
        &self,
        request: CreateCommentRequest,
        viewer: Option<&Viewer>,
    ) -> Result<Comment, Error> {
        let viewer = require_viewer(viewer)?;
        let content = ContentBody::new(request.content)
            .map_err(|err| Error::invalid_field(err.field(), err.to_string()))?;
        let post_id = request.post_id;

        let visible = self
            .storage
            .posts
            .find_by_id(post_id)
            .await
            .map_err(map_post_error)?
            .is_some_and(|post| post.is_visible_to(Some(viewer)));
        if !visible {
            return Err(Error::not_found(format!("post {post_id} not found")));
        }

        let comment = self
            .storage
            .comments
            .create(&NewComment {
                content,
                post_id,
                author_id: viewer.id(),
            })
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = %comment.id, %post_id, author_id = %comment.author_id, "comment created");
        Ok(comment)
    }

    /// Append to the activity log. Anonymous callers are allowed.
    pub async fn log_activity(&self, request: LogActivityRequest) -> Result<Activity, Error> {
        let action = ActivityAction::new(&request.action)
            .map_err(|err| Error::invalid_field("action", err.to_string()))?;
        let activity = self
            .storage
            .activities
            .append(&NewActivity {
                action,
                details: request.details,
            })
            .await
            .map_err(map_activity_error)?;
        info!(activity_id = activity.id.get(), action = activity.action.as_ref(), "activity logged");
        Ok(activity)
    }
}

#[cfg(test)]
#[path = "mutation_service_tests.rs"]
mod tests;
