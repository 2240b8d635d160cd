//! In-process storage adapter implementing every repository port.
//!
//! Used when no database is configured and as the default backing store in
//! tests. It enforces the same rules as the PostgreSQL schema: unique
//! usernames and emails, foreign keys from posts and comments, and ids
//! assigned from per-table sequences starting at 1.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    ActivityPersistenceError, ActivityRepository, CommentPersistenceError, CommentRepository,
    PostPersistenceError, PostRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Activity, ActivityId, Comment, CommentId, NewActivity, NewComment, NewPost, NewUser,
    PasswordHash, Post, PostId, User, UserCredential, UserId,
};

#[derive(Default)]
struct Tables {
    users: Vec<(User, PasswordHash)>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    activities: Vec<Activity>,
}

impl Tables {
    fn user_exists(&self, id: UserId) -> bool {
        self.users.iter().any(|(user, _)| user.id == id)
    }

    fn post_exists(&self, id: PostId) -> bool {
        self.posts.iter().any(|post| post.id == id)
    }
}

/// Mutex-guarded tables held in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

fn next_id(len: usize) -> Result<i32, String> {
    i32::try_from(len + 1).map_err(|_| "id sequence exhausted".to_owned())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables
            .users
            .iter()
            .any(|(existing, _)| existing.username == user.username)
        {
            return Err(UserPersistenceError::duplicate("username"));
        }
        if tables
            .users
            .iter()
            .any(|(existing, _)| existing.email == user.email)
        {
            return Err(UserPersistenceError::duplicate("email"));
        }
        let id = next_id(tables.users.len()).map_err(UserPersistenceError::query)?;
        let stored = User {
            id: UserId::new(id),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: Utc::now(),
        };
        tables
            .users
            .push((stored.clone(), user.password_hash.clone()));
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .iter()
            .find(|(user, _)| user.username.as_ref() == username)
            .map(|(user, _)| user.clone()))
    }

    async fn find_credential_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredential>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .iter()
            .find(|(user, _)| user.username.as_ref() == username)
            .map(|(user, hash)| UserCredential {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.iter().map(|(user, _)| user.clone()).collect())
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.len() as u64)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut tables = self.lock().map_err(PostPersistenceError::query)?;
        if !tables.user_exists(post.author_id) {
            return Err(PostPersistenceError::missing_reference("author"));
        }
        let id = next_id(tables.posts.len()).map_err(PostPersistenceError::query)?;
        let stored = Post {
            id: PostId::new(id),
            title: post.title.clone(),
            content: post.content.clone(),
            author_id: post.author_id,
            created_at: Utc::now(),
            is_public: post.is_public,
        };
        tables.posts.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let tables = self.lock().map_err(PostPersistenceError::query)?;
        Ok(tables.posts.iter().find(|post| post.id == id).cloned())
    }

    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, PostPersistenceError> {
        let tables = self.lock().map_err(PostPersistenceError::query)?;
        Ok(tables
            .posts
            .iter()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Post>, PostPersistenceError> {
        let tables = self.lock().map_err(PostPersistenceError::query)?;
        Ok(tables.posts.clone())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut tables = self.lock().map_err(CommentPersistenceError::query)?;
        if !tables.post_exists(comment.post_id) {
            return Err(CommentPersistenceError::missing_reference("post"));
        }
        if !tables.user_exists(comment.author_id) {
            return Err(CommentPersistenceError::missing_reference("author"));
        }
        let id = next_id(tables.comments.len()).map_err(CommentPersistenceError::query)?;
        let stored = Comment {
            id: CommentId::new(id),
            content: comment.content.clone(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            created_at: Utc::now(),
        };
        tables.comments.push(stored.clone());
        Ok(stored)
    }

    async fn list_by_post(
        &self,
        post_id: PostId,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let tables = self.lock().map_err(CommentPersistenceError::query)?;
        Ok(tables
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Comment>, CommentPersistenceError> {
        let tables = self.lock().map_err(CommentPersistenceError::query)?;
        Ok(tables.comments.clone())
    }
}

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn append(&self, activity: &NewActivity) -> Result<Activity, ActivityPersistenceError> {
        let mut tables = self.lock().map_err(ActivityPersistenceError::query)?;
        let id = next_id(tables.activities.len()).map_err(ActivityPersistenceError::query)?;
        let stored = Activity {
            id: ActivityId::new(id),
            action: activity.action.clone(),
            details: activity.details.clone(),
            timestamp: Utc::now(),
        };
        tables.activities.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Activity>, ActivityPersistenceError> {
        let tables = self.lock().map_err(ActivityPersistenceError::query)?;
        Ok(tables.activities.clone())
    }
}
