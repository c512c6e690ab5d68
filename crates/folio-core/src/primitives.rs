//! # Paging Primitives
//!
//! Hardcoded limits and conventions for the Folio CORE.
//!
//! These constants are compiled into the binary and are immutable at runtime.
//!
//! ## Indexing Convention
//!
//! Page indices are **zero-based**: index `0` is the first page. Every
//! fetcher, the reference server and the renderer's page footer follow this
//! single convention.

/// Index of the first page.
pub const FIRST_PAGE_INDEX: u64 = 0;

/// Page size used when the caller does not provide one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum number of records a single page may request.
///
/// Larger sizes are rejected with `InvalidArgument` before any I/O.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Maximum page index accepted by `PageRequest::new`.
///
/// Keeps `index * size` comfortably inside `u64` so offsets never overflow.
pub const MAX_PAGE_INDEX: u64 = u32::MAX as u64;

/// Maximum number of records accepted when loading a collection from JSON.
pub const MAX_COLLECTION_RECORDS: usize = 1_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_is_zero() {
        assert_eq!(FIRST_PAGE_INDEX, 0);
    }

    #[test]
    fn default_size_within_bounds() {
        assert!(DEFAULT_PAGE_SIZE > 0);
        assert!(DEFAULT_PAGE_SIZE <= MAX_PAGE_SIZE);
    }

    #[test]
    fn max_offset_fits_in_u64() {
        let offset = MAX_PAGE_INDEX.checked_mul(u64::from(MAX_PAGE_SIZE));
        assert!(offset.is_some());
    }
}
