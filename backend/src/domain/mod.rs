//! Domain primitives, ports, and services.
//!
//! Purpose: Define strongly typed entities for the social backend and the
//! services that resolve named read and write operations against the storage
//! ports. Inbound adapters (GraphQL, REST, WebSocket) only talk to the
//! services and the [`OperationRegistry`]; outbound adapters only implement
//! the ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-neutral failure payload.
//! - User, Post, Comment, Activity: stored records and their insert payloads.
//! - Viewer: the authenticated caller.
//! - QueryService / MutationService / OperationRegistry: resolution layer.

pub mod activity;
pub mod auth;
pub mod comment;
pub mod error;
mod hashing;
pub mod login;
pub mod mutation_service;
pub mod operations;
pub mod ports;
pub mod post;
pub mod query_service;
mod repository_errors;
pub mod seeding;
pub mod trace_id;
pub mod user;
pub mod viewer;

pub use self::activity::{
    Activity, ActivityAction, ActivityId, ActivityValidationError, NewActivity,
};
pub use self::auth::{
    CredentialValidationError, LoginCredentials, PASSWORD_MAX_BYTES, Password, PasswordHash,
};
pub use self::comment::{Comment, CommentId, NewComment};
pub use self::error::{Error, ErrorCode};
pub use self::login::AccountLoginService;
pub use self::mutation_service::{
    CreateCommentRequest, CreatePostRequest, CreateUserRequest, LogActivityRequest,
    MutationService,
};
pub use self::operations::{
    ArgSpec, ArgType, OPERATIONS, OperationKind, OperationRegistry, OperationRequest,
    OperationResponse, OperationSpec,
};
pub use self::post::{ContentBody, NewPost, Post, PostId, PostTitle, PostValidationError};
pub use self::query_service::QueryService;
pub use self::seeding::{SeedOutcome, seed_if_empty};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, Role, User, UserCredential, UserId, UserValidationError, Username,
};
pub use self::viewer::Viewer;

