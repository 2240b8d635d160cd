//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{NewPost, Post, PostId, UserId};

use super::diesel_error_mapping::DbFailure;
use super::models::{NewPostRow, PostRow, convert_all};
use super::pool::DbPool;
use super::schema::posts;

/// Diesel-backed implementation of the post repository port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> PostPersistenceError {
    match failure.into() {
        DbFailure::Connection(message) => PostPersistenceError::connection(message),
        DbFailure::ForeignKey(_) => PostPersistenceError::missing_reference("author"),
        DbFailure::Query(message) => PostPersistenceError::query(message),
        DbFailure::Unique(_) => PostPersistenceError::query("unexpected unique violation"),
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewPostRow {
            title: post.title.as_ref(),
            content: post.content.as_ref(),
            author_id: post.author_id.get(),
            is_public: post.is_public,
        };
        let stored: PostRow = diesel::insert_into(posts::table)
            .values(&row)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        Post::try_from(stored).map_err(PostPersistenceError::query)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = posts::table
            .filter(posts::id.eq(id.get()))
            .select(PostRow::as_select())
            .first::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(Post::try_from)
            .transpose()
            .map_err(PostPersistenceError::query)
    }

    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<PostRow> = posts::table
            .filter(posts::author_id.eq(author_id.get()))
            .order(posts::id.asc())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        convert_all(rows).map_err(PostPersistenceError::query)
    }

    async fn list_all(&self) -> Result<Vec<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<PostRow> = posts::table
            .order(posts::id.asc())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        convert_all(rows).map_err(PostPersistenceError::query)
    }
}
