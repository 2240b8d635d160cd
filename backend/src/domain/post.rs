//! Posts and the text bodies shared with comments.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum post title length, matching the `posts.title` column.
pub const TITLE_MAX: usize = 200;

/// Validation errors raised by post and comment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyContent,
}

impl PostValidationError {
    /// Argument name the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyContent => "content",
        }
    }
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Database-assigned post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i32);

impl PostId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed, non-empty post title of at most [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct PostTitle(String);

impl PostTitle {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PostValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PostTitle> for String {
    fn from(value: PostTitle) -> Self {
        value.0
    }
}

/// Free-form text of a post or comment.
///
/// Must contain something other than whitespace. The text is stored as
/// given so authors keep their formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct ContentBody(String);

impl ContentBody {
    pub fn new(raw: impl Into<String>) -> Result<Self, PostValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ContentBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ContentBody> for String {
    fn from(value: ContentBody) -> Self {
        value.0
    }
}

/// Stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[schema(value_type = i32, example = 1)]
    pub id: PostId,
    #[schema(value_type = String, example = "Welcome")]
    pub title: PostTitle,
    #[schema(value_type = String)]
    pub content: ContentBody,
    #[schema(value_type = i32, example = 1)]
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
}

impl Post {
    /// Whether a caller may see this post.
    ///
    /// Public posts are visible to everyone. Private posts are visible to
    /// their author and to admins.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Post, PostId, PostTitle, ContentBody, UserId, Viewer, Role};
    /// use chrono::Utc;
    ///
    /// let post = Post {
    ///     id: PostId::new(1),
    ///     title: PostTitle::new("Draft").unwrap(),
    ///     content: ContentBody::new("wip").unwrap(),
    ///     author_id: UserId::new(2),
    ///     created_at: Utc::now(),
    ///     is_public: false,
    /// };
    /// assert!(!post.is_visible_to(None));
    /// assert!(post.is_visible_to(Some(&Viewer::new(UserId::new(2), Role::User))));
    /// assert!(post.is_visible_to(Some(&Viewer::new(UserId::new(9), Role::Admin))));
    /// ```
    pub fn is_visible_to(&self, viewer: Option<&super::Viewer>) -> bool {
        self.is_public
            || viewer.is_some_and(|viewer| viewer.is_admin() || viewer.id() == self.author_id)
    }
}

/// Insert payload for a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: PostTitle,
    pub content: ContentBody,
    pub author_id: UserId,
    pub is_public: bool,
}
