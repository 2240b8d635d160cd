//! Port abstraction for comment persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Comment, NewComment, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The post or author does not exist.
        MissingReference { entity: String } => "referenced {entity} does not exist",
    }
}

/// Storage for comments. Lists are ordered by ascending id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment and return the stored record.
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError>;

    /// Comments attached to `post_id`.
    async fn list_by_post(&self, post_id: PostId)
    -> Result<Vec<Comment>, CommentPersistenceError>;

    /// Every comment.
    async fn list_all(&self) -> Result<Vec<Comment>, CommentPersistenceError>;
}
