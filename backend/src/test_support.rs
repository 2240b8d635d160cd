//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Nothing here is wired into the server.

use std::sync::Arc;

use crate::domain::ports::{
    CommentRepository, PasswordHashError, PasswordHasher, PostRepository, Storage,
    UserRepository,
};
use crate::domain::{
    Comment, ContentBody, EmailAddress, NewComment, NewPost, NewUser, Password, PasswordHash,
    Post, PostTitle, Role, User, Username, Viewer,
};
use crate::outbound::memory::MemoryStore;

/// Boxed error returned by fixture builders.
pub type FixtureError = Box<dyn std::error::Error + Send + Sync>;

/// Password every account in [`SocialWorld`] is created with.
pub const WORLD_PASSWORD: &str = "correct horse";

/// Reversible hasher that keeps tests fast. Never use outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct InsecureTestHasher;

impl PasswordHasher for InsecureTestHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::from_phc(format!("$plain${}", password.expose())))
    }

    fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        hash.as_str()
            .strip_prefix("$plain$")
            .map(|stored| stored == password.expose())
            .ok_or_else(|| PasswordHashError::malformed_hash("missing $plain$ prefix"))
    }
}

/// A populated in-memory store.
///
/// - `admin` (admin), `john` and `jane` (users);
/// - `welcome`: public post by admin, commented on by jane;
/// - `draft`: private post by john, commented on by john;
/// - `notes`: public post by jane, no comments.
pub struct SocialWorld {
    pub store: Arc<MemoryStore>,
    pub storage: Storage,
    pub admin: User,
    pub john: User,
    pub jane: User,
    pub welcome: Post,
    pub draft: Post,
    pub notes: Post,
    pub welcome_comment: Comment,
    pub draft_comment: Comment,
}

impl SocialWorld {
    pub fn viewer(user: &User) -> Viewer {
        Viewer::from(user)
    }
}

async fn add_user(store: &MemoryStore, name: &str, role: Role) -> Result<User, FixtureError> {
    let hash = InsecureTestHasher.hash(&Password::new(WORLD_PASSWORD)?)?;
    let user = NewUser {
        username: Username::new(name)?,
        email: EmailAddress::new(format!("{name}@social.example"))?,
        password_hash: hash,
        role,
    };
    Ok(UserRepository::create(store, &user).await?)
}

async fn add_post(
    store: &MemoryStore,
    author: &User,
    title: &str,
    is_public: bool,
) -> Result<Post, FixtureError> {
    let post = NewPost {
        title: PostTitle::new(title)?,
        content: ContentBody::new(format!("{title} body"))?,
        author_id: author.id,
        is_public,
    };
    Ok(PostRepository::create(store, &post).await?)
}

async fn add_comment(
    store: &MemoryStore,
    author: &User,
    post: &Post,
    text: &str,
) -> Result<Comment, FixtureError> {
    let comment = NewComment {
        content: ContentBody::new(text)?,
        post_id: post.id,
        author_id: author.id,
    };
    Ok(CommentRepository::create(store, &comment).await?)
}

/// Build the [`SocialWorld`] fixture.
pub async fn social_world() -> Result<SocialWorld, FixtureError> {
    let store = Arc::new(MemoryStore::default());
    let admin = add_user(&store, "admin", Role::Admin).await?;
    let john = add_user(&store, "john", Role::User).await?;
    let jane = add_user(&store, "jane", Role::User).await?;
    let welcome = add_post(&store, &admin, "Welcome", true).await?;
    let draft = add_post(&store, &john, "Draft", false).await?;
    let notes = add_post(&store, &jane, "Notes", true).await?;
    let welcome_comment = add_comment(&store, &jane, &welcome, "Nice to be here").await?;
    let draft_comment = add_comment(&store, &john, &draft, "Reminder to self").await?;
    Ok(SocialWorld {
        storage: Storage::from_shared(store.clone()),
        store,
        admin,
        john,
        jane,
        welcome,
        draft,
        notes,
        welcome_comment,
        draft_comment,
    })
}
