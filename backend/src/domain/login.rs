//! Username/password authentication against the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::hashing::verify_password;
use super::ports::{LoginService, PasswordHashError, PasswordHasher, UserRepository};
use super::repository_errors::map_user_error;
use super::{Error, LoginCredentials, Password, PasswordHash, User};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// [`LoginService`] that checks stored password hashes.
///
/// Unknown usernames are verified against a throwaway hash so both failure
/// paths cost one hash verification.
#[derive(Clone)]
pub struct AccountLoginService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    dummy_hash: PasswordHash,
}

impl AccountLoginService {
    /// Build the service, hashing a random throwaway password once.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Self, PasswordHashError> {
        let throwaway = Password::new(&uuid::Uuid::new_v4().to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        let dummy_hash = hasher.hash(&throwaway)?;
        Ok(Self {
            users,
            hasher,
            dummy_hash,
        })
    }
}

#[async_trait]
impl LoginService for AccountLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_credential_by_username(credentials.username())
            .await
            .map_err(map_user_error)?;

        let (user, hash) = match stored {
            Some(credential) => (Some(credential.user), credential.password_hash),
            None => (None, self.dummy_hash.clone()),
        };
        let matches = verify_password(
            self.hasher.clone(),
            credentials.password().clone(),
            hash,
        )
        .await?;

        match user {
            Some(user) if matches => {
                info!(user_id = %user.id, "login succeeded");
                Ok(user)
            }
            _ => {
                warn!("login rejected");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }
}
