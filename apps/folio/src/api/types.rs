//! # API Request/Response Types
//!
//! JSON structures for the HTTP API. Pages themselves are served as
//! `folio_core::PageEnvelope`, which owns the wire format.

use folio_core::{
    FetchError, PageRequest,
    primitives::{DEFAULT_PAGE_SIZE, FIRST_PAGE_INDEX, MAX_PAGE_SIZE},
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Collection status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub record_count: usize,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl StatusResponse {
    pub fn for_count(record_count: usize) -> Self {
        Self {
            record_count,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

// =============================================================================
// PAGE QUERY
// =============================================================================

/// Query string of `GET /records`.
///
/// Both parameters are optional: `index` defaults to the first page and
/// `size` to `DEFAULT_PAGE_SIZE`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub index: Option<u64>,
    pub size: Option<u32>,
}

impl PageQuery {
    /// Validate into a page request.
    pub fn to_request(&self) -> Result<PageRequest, FetchError> {
        PageRequest::new(
            self.index.unwrap_or(FIRST_PAGE_INDEX),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every 4xx answer produced by the handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}
