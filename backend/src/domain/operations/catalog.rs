//! The static operation table.

use super::{ArgSpec, ArgType, OperationId, OperationKind, OperationSpec};

const fn required(name: &'static str, ty: ArgType) -> ArgSpec {
    ArgSpec {
        name,
        ty,
        required: true,
    }
}

const fn optional(name: &'static str, ty: ArgType) -> ArgSpec {
    ArgSpec {
        name,
        ty,
        required: false,
    }
}

const fn query(name: &'static str, id: OperationId, args: &'static [ArgSpec]) -> OperationSpec {
    OperationSpec {
        name,
        kind: OperationKind::Query,
        args,
        id,
    }
}

const fn mutation(
    name: &'static str,
    id: OperationId,
    args: &'static [ArgSpec],
) -> OperationSpec {
    OperationSpec {
        name,
        kind: OperationKind::Mutation,
        args,
        id,
    }
}

const ID: &[ArgSpec] = &[required("id", ArgType::Int)];
const USERNAME: &[ArgSpec] = &[required("username", ArgType::String)];
const AUTHOR_ID: &[ArgSpec] = &[required("authorId", ArgType::Int)];
const POST_ID: &[ArgSpec] = &[required("postId", ArgType::Int)];
const CREATE_USER: &[ArgSpec] = &[
    required("username", ArgType::String),
    required("email", ArgType::String),
    required("password", ArgType::String),
    optional("role", ArgType::String),
];
const CREATE_POST: &[ArgSpec] = &[
    required("title", ArgType::String),
    required("content", ArgType::String),
    optional("isPublic", ArgType::Boolean),
];
const CREATE_COMMENT: &[ArgSpec] = &[
    required("content", ArgType::String),
    required("postId", ArgType::Int),
];
const LOG_ACTIVITY: &[ArgSpec] = &[
    required("action", ArgType::String),
    required("details", ArgType::String),
];

/// Every operation the registry dispatches, in GraphQL field spelling.
pub static OPERATIONS: &[OperationSpec] = &[
    query("allUsers", OperationId::AllUsers, &[]),
    query("userById", OperationId::UserById, ID),
    query("userByUsername", OperationId::UserByUsername, USERNAME),
    query("allPosts", OperationId::AllPosts, &[]),
    query("postById", OperationId::PostById, ID),
    query("postsByAuthor", OperationId::PostsByAuthor, AUTHOR_ID),
    query("allComments", OperationId::AllComments, &[]),
    query("commentsByPost", OperationId::CommentsByPost, POST_ID),
    query("allActivities", OperationId::AllActivities, &[]),
    mutation("createUser", OperationId::CreateUser, CREATE_USER),
    mutation("createPost", OperationId::CreatePost, CREATE_POST),
    mutation("createComment", OperationId::CreateComment, CREATE_COMMENT),
    mutation("logActivity", OperationId::LogActivity, LOG_ACTIVITY),
];
