//! # folio-core
//!
//! The paged resource access engine for Folio - THE LOGIC.
//!
//! This crate describes how a client requests, decodes and renders one page
//! of homogeneous records from a remote collection:
//!
//! - `types`: the record schema
//! - `envelope`: one page plus pagination metadata, and wire decoding
//! - `request`: validated page requests (zero-based indices)
//! - `state` / `cache`: the Load State and the machine that owns it
//! - `render`: pure mapping from Load State to visual output
//! - `session`: explicitly passed authentication context
//! - `collection`: in-memory backing store that can be paged
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Has NO async and NO network dependencies (pure Rust)
//! - Never performs I/O: fetchers live in the app layer and report back
//!   through `PageCache::complete`
//! - Is deterministic: `BTreeMap` only, so equal pages serialize to equal bytes

// =============================================================================
// MODULES
// =============================================================================

pub mod cache;
pub mod collection;
pub mod envelope;
pub mod error;
pub mod primitives;
pub mod render;
pub mod request;
pub mod session;
pub mod state;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use cache::{Admission, Completion, DuplicatePolicy, PageCache, Ticket};
pub use collection::Collection;
pub use envelope::{PageEnvelope, decode_page};
pub use error::{FetchError, FolioError};
pub use render::{PageFooter, Row, View, render};
pub use request::{PageRequest, total_pages_for};
pub use session::SessionContext;
pub use state::LoadState;
pub use types::{Record, RecordId};
