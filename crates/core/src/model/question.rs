use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::user::Username;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("answer text cannot be empty")]
    EmptyAnswer,
}

/// A student question, addressed to no teacher in particular, and the
/// answer once one responds.
///
/// The asking user is referenced by username only; the reference is never
/// validated or cascaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    username: Username,
    text: String,
    answer: Option<String>,
    created_at: DateTime<Utc>,
}

impl Question {
    /// Creates an unanswered question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyQuestion` if the text is empty after
    /// trimming.
    pub fn new(
        id: QuestionId,
        username: Username,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        Ok(Self {
            id,
            username,
            text,
            answer: None,
            created_at,
        })
    }

    /// Rebuilds a question from persisted parts, re-checking both texts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyQuestion` for empty question text and
    /// `QuestionError::EmptyAnswer` for a present-but-empty answer.
    pub fn from_persisted(
        id: QuestionId,
        username: Username,
        text: impl Into<String>,
        answer: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuestionError> {
        let mut question = Self::new(id, username, text, created_at)?;
        if let Some(answer) = answer {
            question.set_answer(answer)?;
        }
        Ok(question)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sets the answer, replacing any previous one. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyAnswer` if the answer is empty after
    /// trimming; the previous answer is kept in that case.
    pub fn set_answer(&mut self, answer: impl Into<String>) -> Result<(), QuestionError> {
        let answer = answer.into().trim().to_owned();
        if answer.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        self.answer = Some(answer);
        Ok(())
    }
}
