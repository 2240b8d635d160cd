//! Runs the CPU-bound password hasher off the async executor.

use std::sync::Arc;

use tokio::task;

use super::ports::PasswordHasher;
use super::repository_errors::map_hash_error;
use super::{Error, Password, PasswordHash};

pub(crate) async fn hash_password(
    hasher: Arc<dyn PasswordHasher>,
    password: Password,
) -> Result<PasswordHash, Error> {
    task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(map_hash_error)
}

pub(crate) async fn verify_password(
    hasher: Arc<dyn PasswordHasher>,
    password: Password,
    hash: PasswordHash,
) -> Result<bool, Error> {
    task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
        .map_err(map_hash_error)
}
