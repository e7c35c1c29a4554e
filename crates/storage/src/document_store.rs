use std::sync::Arc;

use tracing::{info, warn};

use elevate_core::Clock;
use elevate_core::model::{Document, EntryId, ProgressEntry, Question, QuestionId, Role, Username};

use crate::kv::{KvStore, MemoryStore, StorageError};
use crate::records::{DocumentRecord, LegacyProgressRecord, SCHEMA_VERSION};

/// Slot key holding the canonical portal document.
pub const DOCUMENT_KEY: &str = "techelevateData";

/// Slot keys written by the split-slot layout that predates the document:
/// a bare array of progress entries and a bare array of question strings.
pub const LEGACY_PROGRESS_KEY: &str = "progressData";
pub const LEGACY_QUESTIONS_KEY: &str = "questionsData";

/// Username that owns entries folded in from the legacy slots.
const LEGACY_OWNER: &str = "student";

/// Load/save adapter between the domain [`Document`] and one slot of a
/// [`KvStore`].
///
/// Loading is forgiving: a missing, unreadable, or future-version slot
/// becomes the empty default document. Only raw storage failures surface
/// as errors. Saving always rewrites the whole slot at the current schema
/// version.
pub struct DocumentStore {
    kv: Arc<dyn KvStore>,
    clock: Clock,
}

impl DocumentStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>, clock: Clock) -> Self {
        Self { kv, clock }
    }

    /// Store over a fresh in-memory slot, for tests and prototyping.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(Arc::new(MemoryStore::new()), clock)
    }

    /// Loads the document, upgrading older slot layouts as needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the underlying store fails; bad
    /// slot content is recovered by starting from the default document.
    pub fn load(&self) -> Result<Document, StorageError> {
        if let Some(raw) = self.kv.get(DOCUMENT_KEY)? {
            return Ok(parse_document(&raw));
        }
        if let Some(doc) = self.upgrade_legacy_slots()? {
            return Ok(doc);
        }
        Ok(Document::new())
    }

    /// Serializes the whole document into the canonical slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub fn save(&self, doc: &Document) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&DocumentRecord::from_document(doc))?;
        self.kv.set(DOCUMENT_KEY, &raw)
    }

    /// One-time fold of the split-slot layout into a fresh document owned
    /// by a student user. Runs only when the canonical slot is absent; on
    /// success the canonical slot is written and the legacy slots removed.
    /// An unreadable legacy slot aborts the fold and is left in place.
    fn upgrade_legacy_slots(&self) -> Result<Option<Document>, StorageError> {
        let progress_raw = self.kv.get(LEGACY_PROGRESS_KEY)?;
        let questions_raw = self.kv.get(LEGACY_QUESTIONS_KEY)?;
        if progress_raw.is_none() && questions_raw.is_none() {
            return Ok(None);
        }

        let owner = match Username::new(LEGACY_OWNER) {
            Ok(owner) => owner,
            Err(err) => {
                warn!("legacy owner username is invalid, skipping upgrade: {err}");
                return Ok(None);
            }
        };

        let mut doc = Document::new();
        doc.find_or_create_user(&owner, Role::Student);
        let mut imported = 0usize;

        if let Some(raw) = progress_raw.as_deref() {
            let entries: Vec<LegacyProgressRecord> = match serde_json::from_str(raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("legacy progress slot is unreadable, leaving it in place: {err}");
                    return Ok(None);
                }
            };
            for record in entries {
                let id = EntryId::new(doc.allocate_id());
                match ProgressEntry::new(id, record.text, record.date) {
                    Ok(entry) => {
                        if let Some(user) = doc.user_mut(&owner) {
                            user.record_progress(entry);
                            imported += 1;
                        }
                    }
                    Err(err) => warn!("skipping legacy progress entry: {err}"),
                }
            }
        }

        if let Some(raw) = questions_raw.as_deref() {
            let texts: Vec<String> = match serde_json::from_str(raw) {
                Ok(texts) => texts,
                Err(err) => {
                    warn!("legacy question slot is unreadable, leaving it in place: {err}");
                    return Ok(None);
                }
            };
            // The bare strings carry no dates; stamp them at upgrade time.
            let asked_at = self.clock.now();
            for text in texts {
                let id = QuestionId::new(doc.allocate_id());
                match Question::new(id, owner.clone(), text, asked_at) {
                    Ok(question) => {
                        doc.push_question(question);
                        imported += 1;
                    }
                    Err(err) => warn!("skipping legacy question: {err}"),
                }
            }
        }

        self.save(&doc)?;
        self.kv.remove(LEGACY_PROGRESS_KEY)?;
        self.kv.remove(LEGACY_QUESTIONS_KEY)?;
        info!("folded {imported} legacy entries into the document slot");
        Ok(Some(doc))
    }
}

fn parse_document(raw: &str) -> Document {
    let record: DocumentRecord = match serde_json::from_str(raw) {
        Ok(record) => record,
        Err(err) => {
            warn!("document slot is unreadable, starting fresh: {err}");
            return Document::new();
        }
    };
    if record.version > SCHEMA_VERSION {
        warn!(
            "document slot has unknown schema version {}, starting fresh",
            record.version
        );
        return Document::new();
    }
    match record.into_document() {
        Ok(doc) => doc,
        Err(err) => {
            warn!("document slot failed validation, starting fresh: {err}");
            Document::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elevate_core::model::{Material, MaterialId};
    use elevate_core::time::{fixed_clock, fixed_now};

    fn store_with(kv: MemoryStore) -> DocumentStore {
        DocumentStore::new(Arc::new(kv), fixed_clock())
    }

    #[test]
    fn missing_slot_loads_empty_document() {
        let store = store_with(MemoryStore::new());
        let doc = store.load().unwrap();
        assert_eq!(doc, Document::new());
    }

    #[test]
    fn save_then_load_round_trips() {
        let kv = MemoryStore::new();
        let store = store_with(kv.clone());

        let mut doc = Document::new();
        let id = MaterialId::new(doc.allocate_id());
        doc.push_material(
            Material::new(id, "Algebra", "https://example.com", "", fixed_now()).unwrap(),
        );
        store.save(&doc).unwrap();

        assert_eq!(store_with(kv).load().unwrap(), doc);
    }

    #[test]
    fn corrupt_slot_loads_empty_document() {
        let kv = MemoryStore::new();
        kv.set(DOCUMENT_KEY, "{not json").unwrap();
        let doc = store_with(kv).load().unwrap();
        assert_eq!(doc, Document::new());
    }

    #[test]
    fn future_schema_version_loads_empty_document() {
        let kv = MemoryStore::new();
        kv.set(DOCUMENT_KEY, r#"{"version": 99, "next_id": 5}"#).unwrap();
        let doc = store_with(kv).load().unwrap();
        assert_eq!(doc, Document::new());
    }

    #[test]
    fn legacy_slots_fold_into_document_once() {
        let kv = MemoryStore::new();
        kv.set(
            LEGACY_PROGRESS_KEY,
            r#"[{"date": "2023-11-14T22:13:20Z", "text": "Finished chapter 1"}]"#,
        )
        .unwrap();
        kv.set(LEGACY_QUESTIONS_KEY, r#"["What is a variable?"]"#)
            .unwrap();

        let doc = store_with(kv.clone()).load().unwrap();

        let owner = Username::new("student").unwrap();
        let user = doc.user(&owner).unwrap();
        assert_eq!(user.role(), Role::Student);
        assert_eq!(user.progress().len(), 1);
        assert_eq!(user.progress()[0].text(), "Finished chapter 1");
        assert_eq!(doc.questions().len(), 1);
        assert_eq!(doc.questions()[0].username(), &owner);
        assert_eq!(doc.questions()[0].created_at(), fixed_now());

        // Canonical slot written, legacy slots gone.
        assert!(kv.get(DOCUMENT_KEY).unwrap().is_some());
        assert!(kv.get(LEGACY_PROGRESS_KEY).unwrap().is_none());
        assert!(kv.get(LEGACY_QUESTIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn unreadable_legacy_slot_is_left_in_place() {
        let kv = MemoryStore::new();
        kv.set(LEGACY_PROGRESS_KEY, "not json").unwrap();

        let doc = store_with(kv.clone()).load().unwrap();
        assert_eq!(doc, Document::new());
        assert!(kv.get(LEGACY_PROGRESS_KEY).unwrap().is_some());
        assert!(kv.get(DOCUMENT_KEY).unwrap().is_none());
    }

    #[test]
    fn canonical_slot_wins_over_legacy_slots() {
        let kv = MemoryStore::new();
        let store = store_with(kv.clone());
        store.save(&Document::new()).unwrap();
        kv.set(LEGACY_QUESTIONS_KEY, r#"["stale"]"#).unwrap();

        let doc = store_with(kv.clone()).load().unwrap();
        assert!(doc.questions().is_empty());
        assert!(kv.get(LEGACY_QUESTIONS_KEY).unwrap().is_some());
    }
}
