//! # Page Requests
//!
//! A validated `(index, size)` pair. Constructing a `PageRequest` is the only
//! place arguments are checked, so anything holding one may issue I/O.

use crate::error::FetchError;
use crate::primitives::{FIRST_PAGE_INDEX, MAX_PAGE_INDEX, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A request for one zero-based page of `size` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub index: u64,
    pub size: u32,
}

impl PageRequest {
    /// Validate and build a request.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `size` is zero or above `MAX_PAGE_SIZE`, or
    /// when `index` is above `MAX_PAGE_INDEX`.
    pub fn new(index: u64, size: u32) -> Result<Self, FetchError> {
        if size == 0 {
            return Err(FetchError::InvalidArgument(
                "page size must be positive".to_string(),
            ));
        }
        if size > MAX_PAGE_SIZE {
            return Err(FetchError::InvalidArgument(format!(
                "page size {} exceeds maximum {}",
                size, MAX_PAGE_SIZE
            )));
        }
        if index > MAX_PAGE_INDEX {
            return Err(FetchError::InvalidArgument(format!(
                "page index {} exceeds maximum {}",
                index, MAX_PAGE_INDEX
            )));
        }
        Ok(Self { index, size })
    }

    /// Request the first page.
    pub fn first(size: u32) -> Result<Self, FetchError> {
        Self::new(FIRST_PAGE_INDEX, size)
    }

    /// The page after this one, if it is still a valid request.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::new(self.index.checked_add(1)?, self.size).ok()
    }

    /// Offset of the first record of this page in the collection.
    #[must_use]
    pub fn offset(self) -> u64 {
        // Bounded by MAX_PAGE_INDEX * MAX_PAGE_SIZE, which fits in u64.
        self.index.saturating_mul(u64::from(self.size))
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} (size {})", self.index, self.size)
    }
}

/// Number of pages needed to hold `total` records at `size` per page.
///
/// An empty collection has zero pages.
#[must_use]
pub fn total_pages_for(total: u64, size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_invalid() {
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(FetchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversized_page_is_invalid() {
        assert!(PageRequest::new(0, MAX_PAGE_SIZE).is_ok());
        assert!(matches!(
            PageRequest::new(0, MAX_PAGE_SIZE + 1),
            Err(FetchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn index_beyond_limit_is_invalid() {
        assert!(PageRequest::new(MAX_PAGE_INDEX, 1).is_ok());
        assert!(PageRequest::new(MAX_PAGE_INDEX + 1, 1).is_err());
    }

    #[test]
    fn next_stops_at_limit() {
        let last = PageRequest::new(MAX_PAGE_INDEX, 5).expect("valid");
        assert_eq!(last.next(), None);

        let first = PageRequest::first(5).expect("valid");
        assert_eq!(first.next(), Some(PageRequest { index: 1, size: 5 }));
    }

    #[test]
    fn offset_is_index_times_size() {
        let req = PageRequest::new(3, 20).expect("valid");
        assert_eq!(req.offset(), 60);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages_for(0, 20), 0);
        assert_eq!(total_pages_for(1, 20), 1);
        assert_eq!(total_pages_for(20, 20), 1);
        assert_eq!(total_pages_for(21, 20), 2);
    }

    #[test]
    fn display_names_page_and_size() {
        let req = PageRequest::new(2, 10).expect("valid");
        assert_eq!(req.to_string(), "page 2 (size 10)");
    }
}
