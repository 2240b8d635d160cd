//! The authenticated caller on whose behalf an operation runs.

use super::{Role, User, UserId};

/// Identity and role of an authenticated caller.
///
/// Anonymous callers are represented as `Option<&Viewer>::None` rather than a
/// sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    id: UserId,
    role: Role,
}

impl Viewer {
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub const fn id(&self) -> UserId {
        self.id
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}
