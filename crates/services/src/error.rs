//! Shared error types for the services crate.

use thiserror::Error;

use elevate_core::model::{EntryError, MaterialError, QuestionError, UserError};
use storage::StorageError;

/// Errors emitted by [`Portal`](crate::Portal) operations.
///
/// Validation failures surface before anything is persisted; a failed
/// operation leaves both the in-memory document and the slot untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PortalError {
    #[error("no user is signed in")]
    NotSignedIn,
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Material(#[from] MaterialError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Entry(#[from] EntryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
