use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use elevate_core::model::{
    Activity, Document, DocumentError, EntryError, EntryId, Material, MaterialError, MaterialId,
    ProgressEntry, Question, QuestionError, QuestionId, Role, User, UserError, Username,
};

/// Current canonical schema version of the document slot.
pub const SCHEMA_VERSION: u32 = 1;

/// Validation failures while rehydrating persisted records.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape of the whole document.
///
/// Mirrors the domain `Document` so the adapter can serialize without
/// leaking storage concerns into the domain layer. `version` and `next_id`
/// default to zero so slots written before either existed still parse; the
/// domain constructor repairs the counter on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub next_id: u64,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub materials: Vec<MaterialRecord>,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

/// Persisted shape for one user. Journal arrays may be absent on old data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
    #[serde(default)]
    pub progress: Vec<ProgressRecord>,
}

/// Persisted shape for one activity note. The text field is named
/// `activity` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: EntryId,
    pub activity: String,
    pub date: DateTime<Utc>,
}

/// Persisted shape for one progress note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: EntryId,
    pub text: String,
    pub date: DateTime<Utc>,
}

/// Persisted shape for one material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub id: MaterialId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Persisted shape for one question; `answer` serializes as `null` while
/// unanswered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub username: String,
    pub question: String,
    pub answer: Option<String>,
    pub date: DateTime<Utc>,
}

/// Entry shape of the split-slot layout that predates the document slot:
/// a bare array of these under its own key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyProgressRecord {
    pub date: DateTime<Utc>,
    pub text: String,
}

//
// ─── CONVERSIONS ───────────────────────────────────────────────────────────────
//

impl DocumentRecord {
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            version: SCHEMA_VERSION,
            next_id: doc.next_id(),
            users: doc.users().iter().map(UserRecord::from_user).collect(),
            materials: doc
                .materials()
                .iter()
                .map(MaterialRecord::from_material)
                .collect(),
            questions: doc
                .questions()
                .iter()
                .map(QuestionRecord::from_question)
                .collect(),
        }
    }

    /// Convert the record back into a domain `Document`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if any field fails domain validation or two
    /// users share a username.
    pub fn into_document(self) -> Result<Document, RecordError> {
        let users = self
            .users
            .into_iter()
            .map(UserRecord::into_user)
            .collect::<Result<Vec<_>, _>>()?;
        let materials = self
            .materials
            .into_iter()
            .map(MaterialRecord::into_material)
            .collect::<Result<Vec<_>, _>>()?;
        let questions = self
            .questions
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Document::from_persisted(
            self.next_id,
            users,
            materials,
            questions,
        )?)
    }
}

impl UserRecord {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username().as_str().to_owned(),
            role: user.role(),
            activities: user
                .activities()
                .iter()
                .map(ActivityRecord::from_activity)
                .collect(),
            progress: user
                .progress()
                .iter()
                .map(ProgressRecord::from_entry)
                .collect(),
        }
    }

    /// # Errors
    ///
    /// Returns `RecordError` if the username or any journal entry fails
    /// validation.
    pub fn into_user(self) -> Result<User, RecordError> {
        let username = Username::new(self.username)?;
        let activities = self
            .activities
            .into_iter()
            .map(ActivityRecord::into_activity)
            .collect::<Result<Vec<_>, _>>()?;
        let progress = self
            .progress
            .into_iter()
            .map(ProgressRecord::into_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(User::from_persisted(username, self.role, activities, progress))
    }
}

impl ActivityRecord {
    #[must_use]
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            id: activity.id(),
            activity: activity.text().to_owned(),
            date: activity.created_at(),
        }
    }

    /// # Errors
    ///
    /// Returns `RecordError` if the text is empty after trimming.
    pub fn into_activity(self) -> Result<Activity, RecordError> {
        Ok(Activity::new(self.id, self.activity, self.date)?)
    }
}

impl ProgressRecord {
    #[must_use]
    pub fn from_entry(entry: &ProgressEntry) -> Self {
        Self {
            id: entry.id(),
            text: entry.text().to_owned(),
            date: entry.created_at(),
        }
    }

    /// # Errors
    ///
    /// Returns `RecordError` if the text is empty after trimming.
    pub fn into_entry(self) -> Result<ProgressEntry, RecordError> {
        Ok(ProgressEntry::new(self.id, self.text, self.date)?)
    }
}

impl MaterialRecord {
    #[must_use]
    pub fn from_material(material: &Material) -> Self {
        Self {
            id: material.id(),
            title: material.title().to_owned(),
            url: material.url().to_owned(),
            description: material.description().to_owned(),
            date: material.created_at(),
        }
    }

    /// # Errors
    ///
    /// Returns `RecordError` if the title or url fails validation.
    pub fn into_material(self) -> Result<Material, RecordError> {
        Ok(Material::new(
            self.id,
            self.title,
            self.url,
            self.description,
            self.date,
        )?)
    }
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id(),
            username: question.username().as_str().to_owned(),
            question: question.text().to_owned(),
            answer: question.answer().map(str::to_owned),
            date: question.created_at(),
        }
    }

    /// # Errors
    ///
    /// Returns `RecordError` if the username, question text, or a
    /// present-but-empty answer fails validation.
    pub fn into_question(self) -> Result<Question, RecordError> {
        let username = Username::new(self.username)?;
        Ok(Question::from_persisted(
            self.id,
            username,
            self.question,
            self.answer,
            self.date,
        )?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use elevate_core::time::fixed_now;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        let teacher = Username::new("t1").unwrap();
        let student = Username::new("s1").unwrap();
        doc.find_or_create_user(&teacher, Role::Teacher);
        doc.find_or_create_user(&student, Role::Student);

        let material_id = MaterialId::new(doc.allocate_id());
        doc.push_material(
            Material::new(
                material_id,
                "Algebra",
                "https://example.com/algebra",
                "intro",
                fixed_now(),
            )
            .unwrap(),
        );

        let question_id = QuestionId::new(doc.allocate_id());
        doc.push_question(
            Question::new(question_id, student.clone(), "What is a variable?", fixed_now())
                .unwrap(),
        );

        let entry_id = EntryId::new(doc.allocate_id());
        if let Some(user) = doc.user_mut(&student) {
            user.record_progress(
                ProgressEntry::new(entry_id, "Finished chapter 1", fixed_now()).unwrap(),
            );
        }
        doc
    }

    #[test]
    fn record_round_trips_document() {
        let doc = sample_document();
        let record = DocumentRecord::from_document(&doc);
        assert_eq!(record.version, SCHEMA_VERSION);
        let restored = record.into_document().unwrap();
        assert_eq!(restored, doc);
    }

    #[test]
    fn json_round_trip_preserves_document() {
        let doc = sample_document();
        let raw = serde_json::to_string(&DocumentRecord::from_document(&doc)).unwrap();
        let record: DocumentRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(record.into_document().unwrap(), doc);
    }

    #[test]
    fn unanswered_question_serializes_answer_as_null() {
        let doc = sample_document();
        let raw = serde_json::to_string(&DocumentRecord::from_document(&doc)).unwrap();
        assert!(raw.contains(r#""answer":null"#));
    }

    #[test]
    fn parses_unversioned_slot_shape() {
        // Layout written before the version tag and counter existed: no
        // version, no next_id, journal arrays sometimes missing.
        let raw = r#"{
            "users": [
                {"username": "s1", "role": "student"},
                {"username": "t1", "role": "teacher",
                 "activities": [{"id": 1699999999001, "activity": "set up course", "date": "2023-11-14T22:13:20.000Z"}],
                 "progress": []}
            ],
            "materials": [
                {"id": 1699999999002, "title": "Algebra", "url": "https://example.com", "description": "", "date": "2023-11-14T22:13:20.000Z"}
            ],
            "questions": [
                {"id": 1699999999003, "username": "s1", "question": "What is a variable?", "answer": null, "date": "2023-11-14T22:13:20.000Z"}
            ]
        }"#;

        let record: DocumentRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.version, 0);
        let doc = record.into_document().unwrap();

        assert_eq!(doc.users().len(), 2);
        assert_eq!(doc.materials().len(), 1);
        assert_eq!(doc.questions().len(), 1);
        assert_eq!(doc.questions()[0].id(), QuestionId::new(1_699_999_999_003));
        // Counter lands past the largest persisted identifier.
        assert_eq!(doc.next_id(), 1_699_999_999_004);
    }

    #[test]
    fn rejects_duplicate_usernames() {
        let raw = r#"{
            "users": [
                {"username": "s1", "role": "student"},
                {"username": "s1", "role": "teacher"}
            ]
        }"#;
        let record: DocumentRecord = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            record.into_document(),
            Err(RecordError::Document(_))
        ));
    }

    #[test]
    fn rejects_blank_username_on_rehydrate() {
        let raw = r#"{"users": [{"username": "   ", "role": "student"}]}"#;
        let record: DocumentRecord = serde_json::from_str(raw).unwrap();
        assert!(matches!(record.into_document(), Err(RecordError::User(_))));
    }

    #[test]
    fn unknown_role_fails_to_parse() {
        let raw = r#"{"users": [{"username": "s1", "role": "admin"}]}"#;
        assert!(serde_json::from_str::<DocumentRecord>(raw).is_err());
    }
}
