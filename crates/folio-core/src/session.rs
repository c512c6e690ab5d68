//! # Session Context
//!
//! Authentication state passed explicitly to whoever needs it.
//!
//! There is no global auth hook: the fetcher receives a `SessionContext` to
//! obtain its bearer token, and the renderer receives one to decide whether
//! the session is still being established. Both can therefore be tested
//! with a hand-built context.

use std::fmt;

/// Snapshot of the caller's authentication session.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    loading: bool,
    token: Option<String>,
}

impl SessionContext {
    /// A settled session without credentials.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session that is still being established.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            loading: true,
            token: None,
        }
    }

    /// A settled session carrying a bearer token.
    ///
    /// An empty token is treated as no token.
    #[must_use]
    pub fn authenticated(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            loading: false,
            token: (!token.is_empty()).then_some(token),
        }
    }

    /// Whether the session is still being established.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

// Tokens never reach logs.
impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("loading", &self.loading)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_session_exposes_token() {
        let session = SessionContext::authenticated("secret");
        assert!(!session.is_loading());
        assert_eq!(session.token(), Some("secret"));
    }

    #[test]
    fn empty_token_is_anonymous() {
        assert_eq!(
            SessionContext::authenticated(""),
            SessionContext::anonymous()
        );
    }

    #[test]
    fn pending_session_is_loading() {
        assert!(SessionContext::pending().is_loading());
        assert!(!SessionContext::anonymous().is_loading());
    }

    #[test]
    fn debug_redacts_token() {
        let debug = format!("{:?}", SessionContext::authenticated("hunter2"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
