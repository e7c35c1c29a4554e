use elevate_core::model::Username;

/// Who, if anyone, is currently signed in.
///
/// The context stores only the username key; user data always lives inside
/// the document, so there is never a second copy to keep in sync.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionContext {
    #[default]
    Anonymous,
    Authenticated(Username),
}

impl SessionContext {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionContext::Authenticated(_))
    }

    /// The signed-in username, or `None` while anonymous.
    #[must_use]
    pub fn username(&self) -> Option<&Username> {
        match self {
            SessionContext::Anonymous => None,
            SessionContext::Authenticated(username) => Some(username),
        }
    }

    /// Transition to Authenticated. Signing in over an existing session
    /// simply replaces it.
    pub fn sign_in(&mut self, username: Username) {
        *self = SessionContext::Authenticated(username);
    }

    /// Transition to Anonymous. Signing out twice is fine.
    pub fn sign_out(&mut self) {
        *self = SessionContext::Anonymous;
    }
}
