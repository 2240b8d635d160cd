//! Read-side resolution: named queries mapped onto repository reads.
//!
//! Post visibility is applied here rather than in the adapters: a private
//! post is visible only to its author and to admins, and comments on posts
//! the viewer cannot see are dropped as well.

use std::collections::HashSet;

use tracing::debug;

use super::ports::Storage;
use super::repository_errors::{
    map_activity_error, map_comment_error, map_post_error, map_user_error,
};
use super::{Activity, Comment, Error, Post, PostId, User, UserId, Viewer};

/// Query resolver backed by the storage ports.
#[derive(Clone)]
pub struct QueryService {
    storage: Storage,
}

impl QueryService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Every user, without credentials.
    pub async fn all_users(&self) -> Result<Vec<User>, Error> {
        self.storage.users.list_all().await.map_err(map_user_error)
    }

    /// One user by id.
    pub async fn user_by_id(&self, id: UserId) -> Result<User, Error> {
        self.storage
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    /// Resolve a session's user id to a viewer.
    ///
    /// A session pointing at an account that no longer exists is treated as
    /// anonymous.
    pub async fn viewer(&self, id: UserId) -> Result<Option<Viewer>, Error> {
        let user = self
            .storage
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?;
        Ok(user.as_ref().map(Viewer::from))
    }

    /// One user by exact username.
    pub async fn user_by_username(&self, username: &str) -> Result<User, Error> {
        self.storage
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user '{username}' not found")))
    }

    /// Posts the viewer may see.
    pub async fn all_posts(&self, viewer: Option<&Viewer>) -> Result<Vec<Post>, Error> {
        let posts = self.storage.posts.list_all().await.map_err(map_post_error)?;
        Ok(visible_only(posts, viewer))
    }

    /// One post, reported as missing when the viewer may not see it.
    pub async fn post_by_id(&self, id: PostId, viewer: Option<&Viewer>) -> Result<Post, Error> {
        self.storage
            .posts
            .find_by_id(id)
            .await
            .map_err(map_post_error)?
            .filter(|post| post.is_visible_to(viewer))
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))
    }

    /// Posts written by `author_id` that the viewer may see.
    pub async fn posts_by_author(
        &self,
        author_id: UserId,
        viewer: Option<&Viewer>,
    ) -> Result<Vec<Post>, Error> {
        let posts = self
            .storage
            .posts
            .list_by_author(author_id)
            .await
            .map_err(map_post_error)?;
        Ok(visible_only(posts, viewer))
    }

    /// Comments on posts the viewer may see.
    pub async fn all_comments(&self, viewer: Option<&Viewer>) -> Result<Vec<Comment>, Error> {
        let comments = self
            .storage
            .comments
            .list_all()
            .await
            .map_err(map_comment_error)?;
        if viewer.is_some_and(Viewer::is_admin) {
            return Ok(comments);
        }
        let hidden: HashSet<PostId> = self
            .storage
            .posts
            .list_all()
            .await
            .map_err(map_post_error)?
            .into_iter()
            .filter(|post| !post.is_visible_to(viewer))
            .map(|post| post.id)
            .collect();
        Ok(comments
            .into_iter()
            .filter(|comment| !hidden.contains(&comment.post_id))
            .collect())
    }

    /// Comments on one post; empty when the post is absent or hidden.
    pub async fn comments_by_post(
        &self,
        post_id: PostId,
        viewer: Option<&Viewer>,
    ) -> Result<Vec<Comment>, Error> {
        let post = self
            .storage
            .posts
            .find_by_id(post_id)
            .await
            .map_err(map_post_error)?;
        if post.is_some_and(|post| !post.is_visible_to(viewer)) {
            debug!(%post_id, "comments requested for a hidden post");
            return Ok(Vec::new());
        }
        self.storage
            .comments
            .list_by_post(post_id)
            .await
            .map_err(map_comment_error)
    }

    /// The whole activity log.
    pub async fn all_activities(&self) -> Result<Vec<Activity>, Error> {
        self.storage
            .activities
            .list_all()
            .await
            .map_err(map_activity_error)
    }
}

fn visible_only(posts: Vec<Post>, viewer: Option<&Viewer>) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|post| post.is_visible_to(viewer))
        .collect()
}

#[cfg(test)]
#[path = "query_service_tests.rs"]
mod tests;
