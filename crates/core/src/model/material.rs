use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::MaterialId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MaterialError {
    #[error("material title cannot be empty")]
    EmptyTitle,

    #[error("material url cannot be empty")]
    EmptyUrl,
}

/// A learning resource shared with every user.
///
/// Materials are append-only: posted once, never edited or removed, and
/// visible to both roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    id: MaterialId,
    title: String,
    url: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl Material {
    /// Creates a new material. All text fields are trimmed; the description
    /// may end up empty.
    ///
    /// # Errors
    ///
    /// Returns `MaterialError::EmptyTitle` or `MaterialError::EmptyUrl` when
    /// the respective field is empty after trimming.
    pub fn new(
        id: MaterialId,
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, MaterialError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(MaterialError::EmptyTitle);
        }
        let url = url.into().trim().to_owned();
        if url.is_empty() {
            return Err(MaterialError::EmptyUrl);
        }
        let description = description.into().trim().to_owned();

        Ok(Self {
            id,
            title,
            url,
            description,
            created_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> MaterialId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Case-insensitive substring match against title or description.
    ///
    /// An empty pattern matches everything.
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        let needle = pattern.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}
