//! Opt-in fixture data for fresh installs.
//!
//! Seeding only runs against an empty users table, so restarting with
//! seeding enabled never duplicates rows.

use std::sync::Arc;

use tracing::info;

use super::hashing::hash_password;
use super::ports::{PasswordHasher, Storage};
use super::repository_errors::{map_comment_error, map_post_error, map_user_error};
use super::{
    ContentBody, EmailAddress, Error, NewComment, NewPost, NewUser, Password, PostTitle, Role,
    User, Username,
};

/// What a seeding attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Users already existed; nothing was written.
    Skipped,
    /// Fixture rows were inserted.
    Seeded { users: usize, posts: usize, comments: usize },
}

const SEED_USERS: &[(&str, &str, Role)] = &[
    ("admin", "admin@social.com", Role::Admin),
    ("john", "john@social.com", Role::User),
    ("jane", "jane@social.com", Role::User),
];

const SEED_POSTS: &[(&str, &str, bool)] = &[
    (
        "Welcome to Social Media API",
        "This is our new GraphQL-powered social media platform.",
        true,
    ),
    (
        "Getting Started",
        "Learn how to use our API to build amazing applications.",
        true,
    ),
    (
        "Private Post",
        "This is a private post that should be restricted.",
        false,
    ),
];

/// Comment text and the index into `SEED_USERS` of its author; all comments
/// land on the first post.
const SEED_COMMENTS: &[(&str, usize)] = &[("Great post!", 1), ("Thanks for sharing!", 2)];

fn fixture(err: impl std::fmt::Display) -> Error {
    Error::internal(format!("invalid seed fixture: {err}"))
}

/// Insert the fixture users, posts, and comments when no users exist.
///
/// Every seeded account uses `password`. Posts are authored by `admin`.
pub async fn seed_if_empty(
    storage: &Storage,
    hasher: Arc<dyn PasswordHasher>,
    password: Password,
) -> Result<SeedOutcome, Error> {
    if storage.users.count().await.map_err(map_user_error)? > 0 {
        info!("users present; skipping fixture seeding");
        return Ok(SeedOutcome::Skipped);
    }

    let password_hash = hash_password(hasher, password).await?;
    let mut users: Vec<User> = Vec::with_capacity(SEED_USERS.len());
    for (username, email, role) in SEED_USERS {
        let user = NewUser {
            username: Username::new(username).map_err(fixture)?,
            email: EmailAddress::new(email).map_err(fixture)?,
            password_hash: password_hash.clone(),
            role: *role,
        };
        users.push(storage.users.create(&user).await.map_err(map_user_error)?);
    }
    let admin_id = users
        .first()
        .map(|admin| admin.id)
        .ok_or_else(|| fixture("no seed users"))?;

    let mut posts = Vec::with_capacity(SEED_POSTS.len());
    for (title, content, is_public) in SEED_POSTS {
        let post = NewPost {
            title: PostTitle::new(title).map_err(fixture)?,
            content: ContentBody::new(*content).map_err(fixture)?,
            author_id: admin_id,
            is_public: *is_public,
        };
        posts.push(storage.posts.create(&post).await.map_err(map_post_error)?);
    }
    let first_post = posts
        .first()
        .map(|post| post.id)
        .ok_or_else(|| fixture("no seed posts"))?;

    for (content, author_index) in SEED_COMMENTS {
        let author = users
            .get(*author_index)
            .ok_or_else(|| fixture("comment author out of range"))?;
        let comment = NewComment {
            content: ContentBody::new(*content).map_err(fixture)?,
            post_id: first_post,
            author_id: author.id,
        };
        storage
            .comments
            .create(&comment)
            .await
            .map_err(map_comment_error)?;
    }

    let outcome = SeedOutcome::Seeded {
        users: users.len(),
        posts: posts.len(),
        comments: SEED_COMMENTS.len(),
    };
    info!(?outcome, "fixture data seeded");
    Ok(outcome)
}
