//! PostgreSQL-backed `ActivityRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ActivityPersistenceError, ActivityRepository};
use crate::domain::{Activity, NewActivity};

use super::diesel_error_mapping::DbFailure;
use super::models::{ActivityRow, NewActivityRow, convert_all};
use super::pool::DbPool;
use super::schema::activities;

/// Diesel-backed implementation of the activity log port.
#[derive(Clone)]
pub struct DieselActivityRepository {
    pool: DbPool,
}

impl DieselActivityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> ActivityPersistenceError {
    match failure.into() {
        DbFailure::Connection(message) => ActivityPersistenceError::connection(message),
        DbFailure::Query(message) => ActivityPersistenceError::query(message),
        DbFailure::Unique(_) | DbFailure::ForeignKey(_) => {
            ActivityPersistenceError::query("unexpected constraint violation")
        }
    }
}

#[async_trait]
impl ActivityRepository for DieselActivityRepository {
    async fn append(&self, activity: &NewActivity) -> Result<Activity, ActivityPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewActivityRow {
            action: activity.action.as_ref(),
            details: activity.details.as_str(),
        };
        let stored: ActivityRow = diesel::insert_into(activities::table)
            .values(&row)
            .returning(ActivityRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        Activity::try_from(stored).map_err(ActivityPersistenceError::query)
    }

    async fn list_all(&self) -> Result<Vec<Activity>, ActivityPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<ActivityRow> = activities::table
            .order(activities::id.asc())
            .select(ActivityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        convert_all(rows).map_err(ActivityPersistenceError::query)
    }
}
