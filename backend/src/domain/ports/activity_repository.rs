//! Port abstraction for the append-only activity log.
use async_trait::async_trait;

use crate::domain::{Activity, NewActivity};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by activity repository adapters.
    pub enum ActivityPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "activity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "activity repository query failed: {message}",
    }
}

/// Append-only activity storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append an entry and return it with its id and timestamp.
    async fn append(&self, activity: &NewActivity) -> Result<Activity, ActivityPersistenceError>;

    /// Every entry in insertion order.
    async fn list_all(&self) -> Result<Vec<Activity>, ActivityPersistenceError>;
}
