//! # Page Envelope
//!
//! One page of records plus pagination metadata, and the single decoding
//! entry point for the wire format:
//!
//! ```text
//! { "content": Record[], "totalPages": u32, "pageSize"?: u32, "totalElements"?: u64 }
//! ```

use crate::error::FetchError;
use crate::request::PageRequest;
use crate::types::{Record, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// PAGE ENVELOPE
// =============================================================================

/// One fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    /// Records of this page, in collection order.
    pub content: Vec<Record>,
    /// Total number of pages in the collection at this page size.
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_elements: Option<u64>,
}

impl PageEnvelope {
    /// The envelope of an empty collection.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
            page_size: None,
            total_elements: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether a page follows the page at `index`.
    #[must_use]
    pub fn has_next(&self, index: u64) -> bool {
        index.saturating_add(1) < u64::from(self.total_pages)
    }

    /// Check the size invariants against the request that produced this page.
    ///
    /// # Errors
    ///
    /// `MalformedResponse` if the page holds more records than requested or
    /// than its own declared `pageSize`.
    pub fn check_against(&self, request: &PageRequest) -> Result<(), FetchError> {
        let len = self.content.len();
        if len > request.size as usize {
            return Err(FetchError::MalformedResponse(format!(
                "page holds {} records but {} were requested",
                len, request.size
            )));
        }
        if let Some(page_size) = self.page_size
            && len > page_size as usize
        {
            return Err(FetchError::MalformedResponse(format!(
                "page holds {} records but declares pageSize {}",
                len, page_size
            )));
        }
        Ok(())
    }

    /// Verify identifiers are unique within the page.
    fn check_unique_ids(&self) -> Result<(), FetchError> {
        let mut seen: BTreeSet<RecordId> = BTreeSet::new();
        for record in &self.content {
            if !seen.insert(record.id) {
                return Err(FetchError::MalformedResponse(format!(
                    "duplicate record id {} in page",
                    record.id
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decode a page from a JSON body.
///
/// Any schema mismatch, including a single record missing a required field,
/// fails the whole page.
///
/// # Errors
///
/// `MalformedResponse` with the decoder's detail.
pub fn decode_page(bytes: &[u8]) -> Result<PageEnvelope, FetchError> {
    let envelope: PageEnvelope = serde_json::from_slice(bytes)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
    envelope.check_unique_ids()?;
    Ok(envelope)
}

// =============================================================================
// TESTS
// =============================================================================
