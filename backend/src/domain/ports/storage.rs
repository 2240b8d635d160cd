//! Bundle of repository handles shared by the domain services.

use std::sync::Arc;

use super::{ActivityRepository, CommentRepository, PostRepository, UserRepository};

/// Shared handles to every repository port.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use backend::domain::ports::Storage;
/// use backend::outbound::memory::MemoryStore;
///
/// let storage = Storage::from_shared(Arc::new(MemoryStore::default()));
/// let _users = storage.users.clone();
/// ```
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub activities: Arc<dyn ActivityRepository>,
}

impl Storage {
    /// Use a single adapter that implements every port.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + PostRepository + CommentRepository + ActivityRepository + 'static,
    {
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            activities: store,
        }
    }
}
