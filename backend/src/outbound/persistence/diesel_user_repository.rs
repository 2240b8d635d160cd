//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserCredential, UserId};

use super::diesel_error_mapping::{DbFailure, constraint_column};
use super::models::{CredentialRow, NewUserRow, UserRow, convert_all};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> UserPersistenceError {
    match failure.into() {
        DbFailure::Connection(message) => UserPersistenceError::connection(message),
        DbFailure::Unique(constraint) => UserPersistenceError::duplicate(
            constraint_column(constraint.as_deref(), "users").unwrap_or("username"),
        ),
        DbFailure::Query(message) => UserPersistenceError::query(message),
        DbFailure::ForeignKey(_) => UserPersistenceError::query("unexpected foreign key violation"),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewUserRow {
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_str(),
            role: user.role.as_str(),
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        User::try_from(stored).map_err(UserPersistenceError::query)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = users::table
            .filter(users::id.eq(id.get()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(User::try_from)
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(User::try_from)
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn find_credential_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredential>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = users::table
            .filter(users::username.eq(username))
            .select(CredentialRow::as_select())
            .first::<CredentialRow>(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(UserCredential::try_from)
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        convert_all(rows).map_err(UserPersistenceError::query)
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        u64::try_from(total).map_err(|err| UserPersistenceError::query(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("users_email_key"), "email")]
    #[case(Some("users_username_key"), "username")]
    #[case(None, "username")]
    fn unique_violations_name_the_column(#[case] constraint: Option<&str>, #[case] field: &str) {
        let err = map_failure(DbFailure::Unique(constraint.map(str::to_owned)));
        assert_eq!(err, UserPersistenceError::duplicate(field));
    }

    #[rstest]
    fn connection_failures_stay_connection_failures() {
        let err = map_failure(DbFailure::Connection("refused".to_owned()));
        assert_eq!(err, UserPersistenceError::connection("refused"));
    }
}
