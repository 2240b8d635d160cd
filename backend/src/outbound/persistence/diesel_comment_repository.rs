//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{Comment, NewComment, PostId};

use super::diesel_error_mapping::{DbFailure, constraint_column};
use super::models::{CommentRow, NewCommentRow, convert_all};
use super::pool::DbPool;
use super::schema::comments;

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> CommentPersistenceError {
    match failure.into() {
        DbFailure::Connection(message) => CommentPersistenceError::connection(message),
        DbFailure::ForeignKey(constraint) => {
            let entity = match constraint_column(constraint.as_deref(), "comments") {
                Some("author_id") => "author",
                _ => "post",
            };
            CommentPersistenceError::missing_reference(entity)
        }
        DbFailure::Query(message) => CommentPersistenceError::query(message),
        DbFailure::Unique(_) => CommentPersistenceError::query("unexpected unique violation"),
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewCommentRow {
            content: comment.content.as_ref(),
            post_id: comment.post_id.get(),
            author_id: comment.author_id.get(),
        };
        let stored: CommentRow = diesel::insert_into(comments::table)
            .values(&row)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        Comment::try_from(stored).map_err(CommentPersistenceError::query)
    }

    async fn list_by_post(
        &self,
        post_id: PostId,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::post_id.eq(post_id.get()))
            .order(comments::id.asc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        convert_all(rows).map_err(CommentPersistenceError::query)
    }

    async fn list_all(&self) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<CommentRow> = comments::table
            .order(comments::id.asc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        convert_all(rows).map_err(CommentPersistenceError::query)
    }
}
