use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::EntryId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("entry text cannot be empty")]
    EmptyText,
}

/// One note in a user's activity feed.
///
/// Activities are append-only and owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    id: EntryId,
    text: String,
    created_at: DateTime<Utc>,
}

impl Activity {
    /// Creates an activity note.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::EmptyText` if the text is empty after trimming.
    pub fn new(
        id: EntryId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EntryError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(EntryError::EmptyText);
        }
        Ok(Self { id, text, created_at })
    }

    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One dated note in a user's study progress log.
///
/// Same shape as [`Activity`] but kept distinct: the two feeds are separate
/// collections on the wire and in every view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEntry {
    id: EntryId,
    text: String,
    created_at: DateTime<Utc>,
}

impl ProgressEntry {
    /// Creates a progress note.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::EmptyText` if the text is empty after trimming.
    pub fn new(
        id: EntryId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EntryError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(EntryError::EmptyText);
        }
        Ok(Self { id, text, created_at })
    }

    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
