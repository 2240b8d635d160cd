//! Operation registry: named operations validated and dispatched by name.
//!
//! The table in [`OPERATIONS`] is fixed at compile time. Every transport that
//! accepts operation names (the REST operations route and WebSocket
//! `operation` frames) goes through [`OperationRegistry::execute`], so
//! argument checking is identical everywhere.

mod arguments;
mod catalog;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use tracing::debug;
use utoipa::ToSchema;

use self::arguments::Arguments;
pub use self::catalog::OPERATIONS;
use super::{
    CreateCommentRequest, CreatePostRequest, CreateUserRequest, Error, LogActivityRequest,
    MutationService, PostId, QueryService, UserId, Viewer,
};

/// Whether an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// JSON type an argument must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Int,
    String,
    Boolean,
}

impl ArgType {
    fn describe(self) -> &'static str {
        match self {
            Self::Int => "an integer",
            Self::String => "a string",
            Self::Boolean => "a boolean",
        }
    }
}

/// Declared argument of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub ty: ArgType,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationId {
    AllUsers,
    UserById,
    UserByUsername,
    AllPosts,
    PostById,
    PostsByAuthor,
    AllComments,
    CommentsByPost,
    AllActivities,
    CreateUser,
    CreatePost,
    CreateComment,
    LogActivity,
}

/// One entry of the registry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub name: &'static str,
    pub kind: OperationKind,
    pub args: &'static [ArgSpec],
    id: OperationId,
}

impl OperationSpec {
    /// Look an operation up by its exact name.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{OperationKind, OperationSpec};
    ///
    /// let spec = OperationSpec::find("createPost").expect("registered");
    /// assert_eq!(spec.kind, OperationKind::Mutation);
    /// assert!(OperationSpec::find("runCommand").is_none());
    /// ```
    pub fn find(name: &str) -> Option<&'static Self> {
        OPERATIONS.iter().find(|spec| spec.name == name)
    }
}

/// Transport-neutral operation call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct OperationRequest {
    #[schema(example = "postsByAuthor")]
    pub operation: String,
    /// Argument object; `null` or omitted means no arguments.
    #[serde(default)]
    #[schema(value_type = Object, example = json!({ "authorId": 1 }))]
    pub arguments: Value,
}

impl OperationRequest {
    pub fn new(operation: impl Into<String>, arguments: Value) -> Self {
        Self {
            operation: operation.into(),
            arguments,
        }
    }
}

/// Result of [`OperationRegistry::execute`].
///
/// Serialises as `{"data": {<operation>: …}}` or `{"errors": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResponse {
    Data(Value),
    Errors(Vec<Error>),
}

impl OperationResponse {
    /// First error, if the call failed.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Data(_) => None,
            Self::Errors(errors) => errors.first(),
        }
    }
}

impl From<Error> for OperationResponse {
    fn from(error: Error) -> Self {
        Self::Errors(vec![error])
    }
}

impl Serialize for OperationResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Data(data) => json!({ "data": data }).serialize(serializer),
            Self::Errors(errors) => json!({ "errors": errors }).serialize(serializer),
        }
    }
}

/// Validates calls against [`OPERATIONS`] and dispatches to the services.
#[derive(Clone)]
pub struct OperationRegistry {
    queries: QueryService,
    mutations: MutationService,
}

impl OperationRegistry {
    pub fn new(queries: QueryService, mutations: MutationService) -> Self {
        Self { queries, mutations }
    }

    /// Run one named operation for `viewer`.
    ///
    /// Never panics on bad input: unknown operations produce `bad_request`
    /// and argument problems produce `invalid_request`.
    pub async fn execute(
        &self,
        request: OperationRequest,
        viewer: Option<&Viewer>,
    ) -> OperationResponse {
        let Some(spec) = OperationSpec::find(&request.operation) else {
            return Error::bad_request(format!("unknown operation '{}'", request.operation))
                .with_details(json!({ "operation": request.operation }))
                .into();
        };
        let raw = match request.arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            _ => {
                return Error::invalid_field("arguments", "arguments must be a JSON object")
                    .into();
            }
        };
        let outcome = match Arguments::validate(spec, &raw) {
            Ok(args) => self.dispatch(spec.id, &args, viewer).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(value) => {
                let mut data = Map::new();
                data.insert(spec.name.to_owned(), value);
                OperationResponse::Data(Value::Object(data))
            }
            Err(err) => {
                debug!(operation = spec.name, code = err.code().as_str(), "operation failed");
                err.into()
            }
        }
    }

    async fn dispatch(
        &self,
        id: OperationId,
        args: &Arguments,
        viewer: Option<&Viewer>,
    ) -> Result<Value, Error> {
        match id {
            OperationId::AllUsers => to_value(self.queries.all_users().await?),
            OperationId::UserById => {
                to_value(self.queries.user_by_id(UserId::new(args.int("id")?)).await?)
            }
            OperationId::UserByUsername => {
                to_value(self.queries.user_by_username(&args.string("username")?).await?)
            }
            OperationId::AllPosts => to_value(self.queries.all_posts(viewer).await?),
            OperationId::PostById => to_value(
                self.queries
                    .post_by_id(PostId::new(args.int("id")?), viewer)
                    .await?,
            ),
            OperationId::PostsByAuthor => to_value(
                self.queries
                    .posts_by_author(UserId::new(args.int("authorId")?), viewer)
                    .await?,
            ),
            OperationId::AllComments => to_value(self.queries.all_comments(viewer).await?),
            OperationId::CommentsByPost => to_value(
                self.queries
                    .comments_by_post(PostId::new(args.int("postId")?), viewer)
                    .await?,
            ),
            OperationId::AllActivities => to_value(self.queries.all_activities().await?),
            OperationId::CreateUser => {
                let request = CreateUserRequest {
                    username: args.string("username")?,
                    email: args.string("email")?,
                    password: args.string("password")?,
                    role: args.opt_string("role"),
                };
                to_value(self.mutations.create_user(request, viewer).await?)
            }
            OperationId::CreatePost => {
                let request = CreatePostRequest {
                    title: args.string("title")?,
                    content: args.string("content")?,
                    is_public: args.opt_boolean("isPublic"),
                };
                to_value(self.mutations.create_post(request, viewer).await?)
            }
            OperationId::CreateComment => {
                let request = CreateCommentRequest {
                    content: args.string("content")?,
                    post_id: PostId::new(args.int("postId")?),
                };
                to_value(self.mutations.create_comment(request, viewer).await?)
            }
            OperationId::LogActivity => {
                let request = LogActivityRequest {
                    action: args.string("action")?,
                    details: args.string("details")?,
                };
                to_value(self.mutations.log_activity(request).await?)
            }
        }
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, Error> {
    serde_json::to_value(value)
        .map_err(|err| Error::internal(format!("failed to serialise result: {err}")))
}
