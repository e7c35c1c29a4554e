use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::material::Material;
use crate::model::question::{Question, QuestionError};
use crate::model::user::{Role, User, Username};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("duplicate username in document: {username}")]
    DuplicateUsername { username: String },
}

//
// ─── DOCUMENT ──────────────────────────────────────────────────────────────────
//

/// The single aggregate holding all portal state: users with their
/// journals, the shared materials list, and the question queue.
///
/// A `Document` is loaded whole, mutated in place, and persisted whole.
/// Identifiers come from the embedded `next_id` counter, which never moves
/// backwards; rehydration bumps it past every identifier already present,
/// so a stale or missing persisted counter self-repairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    next_id: u64,
    users: Vec<User>,
    materials: Vec<Material>,
    questions: Vec<Question>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with the counter at its starting value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            users: Vec::new(),
            materials: Vec::new(),
            questions: Vec::new(),
        }
    }

    /// Rebuilds a document from persisted parts.
    ///
    /// The counter is bumped past the largest identifier found in the
    /// parts, so documents written before the counter existed rehydrate
    /// with a usable one.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::DuplicateUsername` if two users share a
    /// username.
    pub fn from_persisted(
        next_id: u64,
        users: Vec<User>,
        materials: Vec<Material>,
        questions: Vec<Question>,
    ) -> Result<Self, DocumentError> {
        let mut seen = HashSet::new();
        for user in &users {
            if !seen.insert(user.username().clone()) {
                return Err(DocumentError::DuplicateUsername {
                    username: user.username().to_string(),
                });
            }
        }
        let floor = max_assigned_id(&users, &materials, &questions).saturating_add(1);
        Ok(Self {
            next_id: next_id.max(floor),
            users,
            materials,
            questions,
        })
    }

    // Accessors
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Hands out the next identifier and advances the counter.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    //
    // ─── USERS ─────────────────────────────────────────────────────────────────
    //

    /// Exact-match lookup by username.
    #[must_use]
    pub fn user(&self, username: &Username) -> Option<&User> {
        self.users.iter().find(|u| u.username() == username)
    }

    /// Exact-match mutable lookup by username.
    pub fn user_mut(&mut self, username: &Username) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.username() == username)
    }

    /// Returns the user with this username, creating one if absent.
    ///
    /// An existing user is returned unchanged: the `role` argument only
    /// applies to a newly created account.
    pub fn find_or_create_user(&mut self, username: &Username, role: Role) -> &User {
        let index = match self.users.iter().position(|u| u.username() == username) {
            Some(index) => index,
            None => {
                self.users.push(User::new(username.clone(), role));
                self.users.len() - 1
            }
        };
        &self.users[index]
    }

    //
    // ─── MATERIALS ─────────────────────────────────────────────────────────────
    //

    /// Appends a material; insertion order is display order.
    pub fn push_material(&mut self, material: Material) {
        self.materials.push(material);
    }

    /// Materials whose title or description contains `pattern`,
    /// case-insensitively, in insertion order. An empty pattern returns
    /// everything.
    #[must_use]
    pub fn filter_materials(&self, pattern: &str) -> Vec<&Material> {
        self.materials
            .iter()
            .filter(|m| m.matches(pattern))
            .collect()
    }

    //
    // ─── QUESTIONS ─────────────────────────────────────────────────────────────
    //

    /// Appends a question; insertion order is creation order.
    pub fn push_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    /// Sets the answer on the question with this id.
    ///
    /// Returns `Ok(true)` when the question was found and updated and
    /// `Ok(false)` when the id is unknown; the unknown case changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyAnswer` if the question exists but the
    /// answer is empty after trimming.
    pub fn answer_question(
        &mut self,
        id: QuestionId,
        answer: &str,
    ) -> Result<bool, QuestionError> {
        match self.questions.iter_mut().find(|q| q.id() == id) {
            Some(question) => question.set_answer(answer).map(|()| true),
            None => Ok(false),
        }
    }

    /// Questions asked by this username, in creation order.
    #[must_use]
    pub fn questions_for(&self, username: &Username) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.username() == username)
            .collect()
    }

    /// Number of questions still waiting for an answer.
    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.questions.iter().filter(|q| !q.is_answered()).count()
    }
}

fn max_assigned_id(users: &[User], materials: &[Material], questions: &[Question]) -> u64 {
    let journal_ids = users.iter().flat_map(|user| {
        user.activities()
            .iter()
            .map(|a| a.id().value())
            .chain(user.progress().iter().map(|p| p.id().value()))
    });
    journal_ids
        .chain(materials.iter().map(|m| m.id().value()))
        .chain(questions.iter().map(|q| q.id().value()))
        .max()
        .unwrap_or(0)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
