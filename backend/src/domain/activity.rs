//! Append-only activity log entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum action length, matching the `activities.action` column.
pub const ACTION_MAX: usize = 100;

/// Validation errors raised by activity values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    EmptyAction,
    ActionTooLong { max: usize },
}

impl fmt::Display for ActivityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAction => write!(f, "action must not be empty"),
            Self::ActionTooLong { max } => write!(f, "action must be at most {max} characters"),
        }
    }
}

impl std::error::Error for ActivityValidationError {}

/// Database-assigned activity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(i32);

impl ActivityId {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Short verb describing what happened, e.g. `page_view`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct ActivityAction(String);

impl ActivityAction {
    /// Validate and construct an action.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ActivityAction;
    ///
    /// assert_eq!(ActivityAction::new(" login ").unwrap().as_ref(), "login");
    /// assert!(ActivityAction::new("").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ActivityValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ActivityValidationError::EmptyAction);
        }
        if trimmed.chars().count() > ACTION_MAX {
            return Err(ActivityValidationError::ActionTooLong { max: ACTION_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ActivityAction {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ActivityAction> for String {
    fn from(value: ActivityAction) -> Self {
        value.0
    }
}

/// Stored activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[schema(value_type = i32)]
    pub id: ActivityId,
    #[schema(value_type = String, example = "page_view")]
    pub action: ActivityAction,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

/// Insert payload for an activity. Details may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub action: ActivityAction,
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", ActivityValidationError::EmptyAction)]
    #[case(" \t", ActivityValidationError::EmptyAction)]
    fn blank_actions_are_rejected(#[case] raw: &str, #[case] expected: ActivityValidationError) {
        assert_eq!(ActivityAction::new(raw).expect_err("blank"), expected);
    }

    #[rstest]
    fn actions_have_a_length_cap() {
        assert!(ActivityAction::new("a".repeat(ACTION_MAX)).is_ok());
        assert_eq!(
            ActivityAction::new("a".repeat(ACTION_MAX + 1)).expect_err("too long"),
            ActivityValidationError::ActionTooLong { max: ACTION_MAX }
        );
    }
}
