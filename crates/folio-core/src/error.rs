//! # Error Taxonomy
//!
//! `FetchError` covers everything that can go wrong while obtaining a page.
//! `FolioError` is the application-level error used by the CLI, the
//! reference server and collection loading.

use crate::request::PageRequest;
use crate::types::RecordId;
use thiserror::Error;

// =============================================================================
// FETCH ERROR
// =============================================================================

/// Errors surfaced by a Page Fetcher or by the Page Cache.
///
/// The `Display` form carries technical detail for logs. User-facing text
/// comes from [`FetchError::user_message`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Caller misuse: bad index or size. Not retryable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport failure (connect, timeout, body read). Transient.
    #[error("Network error: {0}")]
    Network(String),

    /// The remote answered with a non-2xx status.
    #[error("Remote error: HTTP {0}")]
    Remote(u16),

    /// The response body did not match the record schema. Not retryable.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The same page is already in flight and the cache rejects duplicates.
    #[error("{0} is already loading")]
    AlreadyLoading(PageRequest),

    /// The consuming view is gone; no further requests are accepted.
    #[error("View is unmounted")]
    Unmounted,
}

impl FetchError {
    /// Whether a caller-driven retry may succeed.
    ///
    /// Only transport failures and 5xx responses qualify.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Remote(status) => (500..600).contains(status),
            Self::InvalidArgument(_)
            | Self::MalformedResponse(_)
            | Self::AlreadyLoading(_)
            | Self::Unmounted => false,
        }
    }

    /// Whether this is a coordination error rather than a fetch failure.
    #[must_use]
    pub fn is_coordination(&self) -> bool {
        matches!(self, Self::AlreadyLoading(_) | Self::Unmounted)
    }

    /// Stable snake_case label, used as a structured log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Network(_) => "network_error",
            Self::Remote(_) => "remote_error",
            Self::MalformedResponse(_) => "malformed_response",
            Self::AlreadyLoading(_) => "already_loading",
            Self::Unmounted => "unmounted",
        }
    }

    /// Human-readable message for display.
    ///
    /// Never includes transport detail, payload excerpts or stack text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidArgument(_) => "The requested page is not valid.".to_string(),
            Self::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Remote(401 | 403) => "You are not authorized to view this list.".to_string(),
            Self::Remote(404) => "The list could not be found.".to_string(),
            Self::Remote(429) => "Too many requests. Please wait and try again.".to_string(),
            Self::Remote(status) if (500..600).contains(status) => {
                "The server encountered an error. Please try again later.".to_string()
            }
            Self::Remote(status) => format!("The server rejected the request (status {status})."),
            Self::MalformedResponse(_) => {
                "The server returned data in an unexpected format.".to_string()
            }
            Self::AlreadyLoading(_) => "This page is already loading.".to_string(),
            Self::Unmounted => "This view is no longer active.".to_string(),
        }
    }
}

// =============================================================================
// APPLICATION ERROR
// =============================================================================

/// Errors from the Folio application layer.
#[derive(Debug, Error)]
pub enum FolioError {
    /// A page fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A record with this id already exists in the collection.
    #[error("Duplicate record id: {0}")]
    DuplicateRecord(RecordId),

    /// A data file could not be parsed or violates collection limits.
    #[error("Data error: {0}")]
    Data(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(FetchError::Network("reset".into()).is_retryable());
        assert!(FetchError::Remote(503).is_retryable());
        assert!(!FetchError::Remote(429).is_retryable());
        assert!(!FetchError::Remote(404).is_retryable());
        assert!(!FetchError::MalformedResponse("x".into()).is_retryable());
        assert!(!FetchError::InvalidArgument("x".into()).is_retryable());
        assert!(!FetchError::Unmounted.is_retryable());
    }

    #[test]
    fn user_message_hides_transport_detail() {
        let err = FetchError::Network("tcp connect error: 10.0.0.1:443 refused".into());
        let msg = err.user_message();
        assert!(!msg.contains("10.0.0.1"));
        assert!(!msg.contains("tcp"));
    }

    #[test]
    fn user_message_hides_payload_detail() {
        let err = FetchError::MalformedResponse("missing field `content` at line 1".into());
        assert!(!err.user_message().contains("content"));
    }

    #[test]
    fn remote_status_messages() {
        assert!(FetchError::Remote(401).user_message().contains("not authorized"));
        assert!(FetchError::Remote(502).user_message().contains("server encountered"));
        assert!(FetchError::Remote(418).user_message().contains("418"));
    }

    #[test]
    fn coordination_errors() {
        let req = PageRequest::first(10).expect("valid");
        assert!(FetchError::AlreadyLoading(req).is_coordination());
        assert!(FetchError::Unmounted.is_coordination());
        assert!(!FetchError::Remote(500).is_coordination());
    }

    #[test]
    fn fetch_error_converts_into_folio_error() {
        let err: FolioError = FetchError::Remote(500).into();
        assert!(matches!(err, FolioError::Fetch(FetchError::Remote(500))));
        assert_eq!(err.to_string(), "Remote error: HTTP 500");
    }
}
