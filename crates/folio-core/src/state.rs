//! # Load State
//!
//! Finite-state representation of fetch progress for one view.
//!
//! ```text
//! Idle    ──request──────▶ Loading
//! Loading ──success──────▶ Loaded
//! Loading ──failure──────▶ Error
//! Loading ──newer request▶ Loading   (older fetch becomes stale)
//! Loaded  ──request──────▶ Loading
//! Error   ──retry/request▶ Loading
//! ```

use crate::envelope::PageEnvelope;
use crate::error::FetchError;
use crate::request::PageRequest;

/// Fetch progress of a view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Mounted, nothing requested yet.
    #[default]
    Idle,
    /// A fetch for this request is in flight.
    Loading(PageRequest),
    /// The most recent fetch succeeded.
    Loaded(PageEnvelope),
    /// The most recent fetch failed.
    Error(FetchError),
}

impl LoadState {
    /// `Idle` or `Loading`: nothing settled to show yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Idle | Self::Loading(_))
    }

    #[must_use]
    pub fn envelope(&self) -> Option<&PageEnvelope> {
        match self {
            Self::Loaded(envelope) => Some(envelope),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading(_) => "loading",
            Self::Loaded(_) => "loaded",
            Self::Error(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert_eq!(LoadState::default(), LoadState::Idle);
    }

    #[test]
    fn pending_states() {
        let req = PageRequest::first(5).expect("valid");
        assert!(LoadState::Idle.is_pending());
        assert!(LoadState::Loading(req).is_pending());
        assert!(!LoadState::Loaded(PageEnvelope::empty()).is_pending());
        assert!(!LoadState::Error(FetchError::Remote(500)).is_pending());
    }

    #[test]
    fn accessors() {
        let loaded = LoadState::Loaded(PageEnvelope::empty());
        assert!(loaded.envelope().is_some());
        assert!(loaded.error().is_none());
        assert_eq!(loaded.label(), "loaded");

        let failed = LoadState::Error(FetchError::Network("x".into()));
        assert_eq!(failed.error(), Some(&FetchError::Network("x".into())));
        assert_eq!(failed.label(), "error");
    }
}
