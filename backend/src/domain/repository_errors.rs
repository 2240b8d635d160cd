//! Translation of port errors into transport-neutral domain errors.

use serde_json::json;

use super::Error;
use super::ports::{
    ActivityPersistenceError, CommentPersistenceError, PasswordHashError, PostPersistenceError,
    UserPersistenceError,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => {
            Error::conflict(format!("{field} is already taken"))
                .with_details(json!({ "field": field }))
        }
    }
}

pub(crate) fn map_post_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostPersistenceError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
        PostPersistenceError::MissingReference { entity } => {
            Error::not_found(format!("{entity} not found"))
        }
    }
}

pub(crate) fn map_comment_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentPersistenceError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentPersistenceError::MissingReference { entity } => {
            Error::not_found(format!("{entity} not found"))
        }
    }
}

pub(crate) fn map_activity_error(error: ActivityPersistenceError) -> Error {
    match error {
        ActivityPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("activity repository unavailable: {message}"))
        }
        ActivityPersistenceError::Query { message } => {
            Error::internal(format!("activity repository error: {message}"))
        }
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}
