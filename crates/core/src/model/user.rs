use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::journal::{Activity, ProgressEntry};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("username cannot be empty")]
    EmptyUsername,
}

//
// ─── ROLE ──────────────────────────────────────────────────────────────────────
//

/// Account role, fixed the first time a username signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    #[must_use]
    pub fn is_teacher(&self) -> bool {
        matches!(self, Role::Teacher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

//
// ─── USERNAME ──────────────────────────────────────────────────────────────────
//

/// Validated account name (trimmed, non-empty).
///
/// Usernames are the sole identity key; equality is exact and
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    /// Create a validated username.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyUsername` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, UserError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserError::EmptyUsername);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── USER ──────────────────────────────────────────────────────────────────────
//

/// An account plus the journal entries it owns.
///
/// Users are created on first sign-in and never deleted. The role picked at
/// that first sign-in sticks; later sign-ins reuse the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    username: Username,
    role: Role,
    activities: Vec<Activity>,
    progress: Vec<ProgressEntry>,
}

impl User {
    /// Creates a fresh user with empty journals.
    #[must_use]
    pub fn new(username: Username, role: Role) -> Self {
        Self {
            username,
            role,
            activities: Vec::new(),
            progress: Vec::new(),
        }
    }

    /// Rebuilds a user from persisted parts.
    #[must_use]
    pub fn from_persisted(
        username: Username,
        role: Role,
        activities: Vec<Activity>,
        progress: Vec<ProgressEntry>,
    ) -> Self {
        Self {
            username,
            role,
            activities,
            progress,
        }
    }

    // Accessors
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    #[must_use]
    pub fn progress(&self) -> &[ProgressEntry] {
        &self.progress
    }

    /// Appends a note to this user's activity feed.
    pub fn record_activity(&mut self, activity: Activity) {
        self.activities.push(activity);
    }

    /// Appends a note to this user's progress log.
    pub fn record_progress(&mut self, entry: ProgressEntry) {
        self.progress.push(entry);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
