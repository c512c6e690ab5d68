//! # Page Fetcher Seam
//!
//! `PageFetcher` is what the controller drives. It receives an already
//! validated `PageRequest` and performs exactly one read for it; retrying is
//! the caller's business.
//!
//! Implementations:
//! - `client::HttpFetcher`: the wire contract over reqwest
//! - `CollectionFetcher`: an in-process collection, for local previews

use folio_core::{Collection, FetchError, PageEnvelope, PageRequest};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of pages.
pub trait PageFetcher: Send + Sync + 'static {
    /// Fetch one page. Must not retry internally.
    fn fetch(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<PageEnvelope, FetchError>> + Send;
}

/// Fetcher backed by an in-process collection.
#[derive(Clone, Default)]
pub struct CollectionFetcher {
    collection: Arc<RwLock<Collection>>,
}

impl CollectionFetcher {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection: Arc::new(RwLock::new(collection)),
        }
    }

    /// Share a collection that may be mutated elsewhere.
    pub fn shared(collection: Arc<RwLock<Collection>>) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> Arc<RwLock<Collection>> {
        Arc::clone(&self.collection)
    }
}

impl PageFetcher for CollectionFetcher {
    async fn fetch(&self, request: PageRequest) -> Result<PageEnvelope, FetchError> {
        Ok(self.collection.read().await.page(&request))
    }
}
