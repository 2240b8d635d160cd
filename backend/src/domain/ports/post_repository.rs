//! Port abstraction for post persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// A foreign key points at a row that does not exist.
        MissingReference { entity: String } => "referenced {entity} does not exist",
    }
}

/// Storage for posts. Lists are ordered by ascending id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post and return the stored record.
    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Every post written by `author_id`, regardless of visibility.
    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, PostPersistenceError>;

    /// Every post, regardless of visibility.
    async fn list_all(&self) -> Result<Vec<Post>, PostPersistenceError>;
}
