use std::fmt;

use elevate_core::Clock;
use elevate_core::model::{
    Activity, Document, EntryId, Material, MaterialId, ProgressEntry, Question, QuestionId, Role,
    User, Username,
};
use storage::DocumentStore;

use crate::error::PortalError;
use crate::session::SessionContext;

/// The application controller: one live document, one session, one store.
///
/// Every mutating operation edits the in-memory document and immediately
/// writes the whole document back through the store; a failed validation
/// returns before anything is persisted. All operations are synchronous and
/// run to completion. Two portals over the same slot are last-writer-wins,
/// as in the original single-tab design.
pub struct Portal {
    clock: Clock,
    store: DocumentStore,
    doc: Document,
    session: SessionContext,
}

impl Portal {
    /// Opens a portal over `store`, loading the document once.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Storage` if the underlying store cannot be
    /// read. Unreadable slot content is not an error; it loads as the
    /// empty document.
    pub fn open(clock: Clock, store: DocumentStore) -> Result<Self, PortalError> {
        let doc = store.load()?;
        Ok(Self {
            clock,
            store,
            doc,
            session: SessionContext::Anonymous,
        })
    }

    /// Portal over a fresh in-memory slot, for tests and prototyping.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Storage` if the initial load fails.
    pub fn in_memory(clock: Clock) -> Result<Self, PortalError> {
        Self::open(clock, DocumentStore::in_memory(clock))
    }

    //
    // ─── SESSION ───────────────────────────────────────────────────────────────
    //

    /// Signs a user in, creating the account on first sight.
    ///
    /// Returns the effective role: for an existing account that is the
    /// stored one, and the `role` argument is ignored.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::User` for a blank username and
    /// `PortalError::Storage` if the persist fails.
    pub fn login(&mut self, username: &str, role: Role) -> Result<Role, PortalError> {
        let username = Username::new(username)?;
        let effective = self.doc.find_or_create_user(&username, role).role();
        self.store.save(&self.doc)?;
        self.session.sign_in(username);
        Ok(effective)
    }

    /// Signs the current user out. Nothing is persisted; nothing changed.
    pub fn logout(&mut self) {
        self.session.sign_out();
    }

    //
    // ─── REPOSITORY OPERATIONS ─────────────────────────────────────────────────
    //

    /// Posts a learning material visible to everyone.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Material` for a blank title or url and
    /// `PortalError::Storage` if the persist fails.
    pub fn post_material(
        &mut self,
        title: &str,
        url: &str,
        description: &str,
    ) -> Result<MaterialId, PortalError> {
        let id = MaterialId::new(self.doc.allocate_id());
        let material = Material::new(id, title, url, description, self.clock.now())?;
        self.doc.push_material(material);
        self.store.save(&self.doc)?;
        Ok(id)
    }

    /// Asks a question on behalf of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::NotSignedIn` while anonymous,
    /// `PortalError::Question` for blank text, and `PortalError::Storage`
    /// if the persist fails.
    pub fn ask_question(&mut self, text: &str) -> Result<QuestionId, PortalError> {
        let username = self.session_username()?.clone();
        let id = QuestionId::new(self.doc.allocate_id());
        let question = Question::new(id, username, text, self.clock.now())?;
        self.doc.push_question(question);
        self.store.save(&self.doc)?;
        Ok(id)
    }

    /// Answers the question with this id, overwriting any previous answer.
    ///
    /// Returns `Ok(false)` for an unknown id; nothing is persisted in that
    /// case.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Question` for a blank answer and
    /// `PortalError::Storage` if the persist fails.
    pub fn answer_question(
        &mut self,
        id: QuestionId,
        answer: &str,
    ) -> Result<bool, PortalError> {
        if !self.doc.answer_question(id, answer)? {
            return Ok(false);
        }
        self.store.save(&self.doc)?;
        Ok(true)
    }

    /// Appends a note to the signed-in user's progress log.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::NotSignedIn` while anonymous,
    /// `PortalError::Entry` for blank text, and `PortalError::Storage` if
    /// the persist fails.
    pub fn log_progress(&mut self, text: &str) -> Result<EntryId, PortalError> {
        let username = self.session_username()?.clone();
        let id = EntryId::new(self.doc.allocate_id());
        let entry = ProgressEntry::new(id, text, self.clock.now())?;
        let user = self
            .doc
            .user_mut(&username)
            .ok_or(PortalError::NotSignedIn)?;
        user.record_progress(entry);
        self.store.save(&self.doc)?;
        Ok(id)
    }

    /// Appends a note to the signed-in user's activity feed.
    ///
    /// # Errors
    ///
    /// Same contract as [`Portal::log_progress`].
    pub fn record_activity(&mut self, text: &str) -> Result<EntryId, PortalError> {
        let username = self.session_username()?.clone();
        let id = EntryId::new(self.doc.allocate_id());
        let activity = Activity::new(id, text, self.clock.now())?;
        let user = self
            .doc
            .user_mut(&username)
            .ok_or(PortalError::NotSignedIn)?;
        user.record_activity(activity);
        self.store.save(&self.doc)?;
        Ok(id)
    }

    //
    // ─── PROJECTIONS ───────────────────────────────────────────────────────────
    //

    /// The signed-in user, read from the authoritative document copy.
    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.doc.user(self.session.username()?)
    }

    /// Materials whose title or description contains `pattern`,
    /// case-insensitively; an empty pattern returns everything.
    #[must_use]
    pub fn materials_matching(&self, pattern: &str) -> Vec<&Material> {
        self.doc.filter_materials(pattern)
    }

    /// Questions asked by the signed-in user; empty while anonymous.
    #[must_use]
    pub fn my_questions(&self) -> Vec<&Question> {
        match self.session.username() {
            Some(username) => self.doc.questions_for(username),
            None => Vec::new(),
        }
    }

    /// Number of questions still waiting for an answer.
    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.doc.unanswered_count()
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn session_username(&self) -> Result<&Username, PortalError> {
        self.session.username().ok_or(PortalError::NotSignedIn)
    }
}

impl fmt::Debug for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Portal")
            .field("session", &self.session)
            .field("users_len", &self.doc.users().len())
            .field("materials_len", &self.doc.materials().len())
            .field("questions_len", &self.doc.questions().len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use elevate_core::time::fixed_clock;
    use storage::{DOCUMENT_KEY, KvStore, MemoryStore};

    fn portal() -> Portal {
        Portal::in_memory(fixed_clock()).unwrap()
    }

    fn portal_over(kv: MemoryStore) -> Portal {
        let store = DocumentStore::new(Arc::new(kv), fixed_clock());
        Portal::open(fixed_clock(), store).unwrap()
    }

    #[test]
    fn login_creates_user_once() {
        let mut portal = portal();
        portal.login("alice", Role::Student).unwrap();
        portal.logout();
        portal.login("alice", Role::Student).unwrap();
        assert_eq!(portal.document().users().len(), 1);
    }

    #[test]
    fn login_keeps_stored_role() {
        let mut portal = portal();
        portal.login("alice", Role::Student).unwrap();
        portal.logout();
        let effective = portal.login("alice", Role::Teacher).unwrap();
        assert_eq!(effective, Role::Student);
        assert_eq!(portal.current_user().unwrap().role(), Role::Student);
    }

    #[test]
    fn login_rejects_blank_username() {
        let mut portal = portal();
        let err = portal.login("   ", Role::Student).unwrap_err();
        assert!(matches!(err, PortalError::User(_)));
        assert!(!portal.session().is_authenticated());
    }

    #[test]
    fn login_persists_the_new_account() {
        let kv = MemoryStore::new();
        portal_over(kv.clone()).login("alice", Role::Teacher).unwrap();

        let reopened = portal_over(kv);
        let stored = reopened
            .document()
            .user(&Username::new("alice").unwrap())
            .unwrap();
        assert_eq!(stored.role(), Role::Teacher);
    }

    #[test]
    fn logout_clears_session_without_writing() {
        let kv = MemoryStore::new();
        let mut portal = portal_over(kv.clone());
        portal.login("alice", Role::Student).unwrap();
        let before = kv.get(DOCUMENT_KEY).unwrap();

        portal.logout();
        assert!(!portal.session().is_authenticated());
        assert!(portal.current_user().is_none());
        assert_eq!(kv.get(DOCUMENT_KEY).unwrap(), before);
    }

    #[test]
    fn post_material_requires_title_and_url() {
        let mut portal = portal();
        portal.login("t1", Role::Teacher).unwrap();
        assert!(matches!(
            portal.post_material("  ", "https://x", ""),
            Err(PortalError::Material(_))
        ));
        assert!(matches!(
            portal.post_material("Algebra", "", ""),
            Err(PortalError::Material(_))
        ));
        assert!(portal.document().materials().is_empty());
    }

    #[test]
    fn ask_question_requires_a_session() {
        let mut portal = portal();
        let err = portal.ask_question("What is a variable?").unwrap_err();
        assert!(matches!(err, PortalError::NotSignedIn));
    }

    #[test]
    fn answer_unknown_question_persists_nothing() {
        let kv = MemoryStore::new();
        let mut portal = portal_over(kv.clone());
        let answered = portal
            .answer_question(QuestionId::new(999), "anything")
            .unwrap();
        assert!(!answered);
        assert!(kv.get(DOCUMENT_KEY).unwrap().is_none());
    }

    #[test]
    fn reanswering_overwrites() {
        let mut portal = portal();
        portal.login("s1", Role::Student).unwrap();
        let id = portal.ask_question("What is a variable?").unwrap();

        assert!(portal.answer_question(id, "First.").unwrap());
        assert!(portal.answer_question(id, "Second.").unwrap());

        let question = portal.my_questions()[0];
        assert_eq!(question.answer(), Some("Second."));
        assert_eq!(question.text(), "What is a variable?");
    }

    #[test]
    fn progress_lands_on_the_document_user() {
        let mut portal = portal();
        portal.login("s1", Role::Student).unwrap();
        portal.log_progress("Finished chapter 1").unwrap();

        // The session projection and the document copy are one instance.
        assert_eq!(portal.current_user().unwrap().progress().len(), 1);
        let in_doc = portal
            .document()
            .user(&Username::new("s1").unwrap())
            .unwrap();
        assert_eq!(in_doc.progress()[0].text(), "Finished chapter 1");
    }

    #[test]
    fn activity_requires_text() {
        let mut portal = portal();
        portal.login("s1", Role::Student).unwrap();
        assert!(matches!(
            portal.record_activity("   "),
            Err(PortalError::Entry(_))
        ));
        assert!(portal.current_user().unwrap().activities().is_empty());
    }

    #[test]
    fn my_questions_is_scoped_to_the_session_user() {
        let mut portal = portal();
        portal.login("s1", Role::Student).unwrap();
        portal.ask_question("mine").unwrap();
        portal.logout();
        portal.login("s2", Role::Student).unwrap();
        portal.ask_question("theirs").unwrap();

        let mine = portal.my_questions();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].text(), "theirs");
        portal.logout();
        assert!(portal.my_questions().is_empty());
    }
}
