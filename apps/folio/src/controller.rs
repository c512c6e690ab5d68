//! # Page Controller
//!
//! Async driver around `folio_core::PageCache` for one view.
//!
//! The controller asks the cache for admission, runs the fetch without
//! holding the cache lock, then hands the outcome back. The cache decides
//! whether the outcome is still current. Every applied transition is
//! published on a `watch` channel so renderers can follow along.
//!
//! Nothing here throws across the state boundary: fetch failures end up in
//! `LoadState::Error` and calls report a [`LoadOutcome`].

use crate::fetcher::PageFetcher;
use folio_core::{
    Admission, Completion, DuplicatePolicy, FetchError, LoadState, PageCache, SessionContext,
    Ticket, View, render,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// What a `load` or `retry` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetch resolved and its outcome is the current state.
    Applied,
    /// The fetch resolved after being superseded or unmounted; discarded.
    Stale,
    /// The page was already in flight; this call issued no fetch.
    Joined,
    /// Nothing was fetched.
    Rejected(FetchError),
}

/// Drives fetches for one view.
pub struct PageController<F> {
    fetcher: Arc<F>,
    cache: Arc<Mutex<PageCache>>,
    state_tx: Arc<watch::Sender<LoadState>>,
    // Mirrors `PageCache::is_mounted` so waiters can read it without the lock.
    mounted: Arc<AtomicBool>,
}

impl<F> Clone for PageController<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            cache: Arc::clone(&self.cache),
            state_tx: Arc::clone(&self.state_tx),
            mounted: Arc::clone(&self.mounted),
        }
    }
}

impl<F: PageFetcher> PageController<F> {
    /// Mount a view whose duplicate requests join the in-flight fetch.
    pub fn new(fetcher: F) -> Self {
        Self::with_policy(fetcher, DuplicatePolicy::Join)
    }

    pub fn with_policy(fetcher: F, policy: DuplicatePolicy) -> Self {
        let (state_tx, _) = watch::channel(LoadState::Idle);
        Self {
            fetcher: Arc::new(fetcher),
            cache: Arc::new(Mutex::new(PageCache::with_policy(policy))),
            state_tx: Arc::new(state_tx),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoadState {
        self.lock().state().clone()
    }

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state_tx.subscribe()
    }

    /// Render the current state.
    pub fn view(&self, session: &SessionContext) -> View {
        render(self.lock().state(), session)
    }

    /// Load page `index` with `size` records.
    pub async fn load(&self, index: u64, size: u32) -> LoadOutcome {
        let admission = {
            let mut cache = self.lock();
            let admission = cache.request(index, size);
            self.publish(&cache);
            admission
        };
        self.drive(admission).await
    }

    /// Retry the last request after a failure.
    pub async fn retry(&self) -> LoadOutcome {
        let admission = {
            let mut cache = self.lock();
            let admission = cache.retry();
            self.publish(&cache);
            admission
        };
        self.drive(admission).await
    }

    /// The view is gone. In-flight results will be discarded.
    pub fn unmount(&self) {
        {
            let mut cache = self.lock();
            cache.unmount();
            self.mounted.store(false, Ordering::SeqCst);
        }
        // The state itself is frozen; wake `settled` waiters anyway.
        self.state_tx.send_modify(|_| {});
        tracing::debug!(event = "view_unmounted", "View unmounted");
    }

    /// Wait until the state is `Loaded` or `Error`, or the view unmounts.
    ///
    /// After an unmount this returns the frozen state, which may still be
    /// `Loading`. Waits indefinitely on a mounted controller that has never
    /// been asked to load.
    pub async fn settled(&self) -> LoadState {
        let mut rx = self.subscribe();
        let mounted = Arc::clone(&self.mounted);
        let done = |state: &LoadState| !mounted.load(Ordering::SeqCst) || !state.is_pending();
        match rx.wait_for(done).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    async fn drive(&self, admission: Admission) -> LoadOutcome {
        match admission {
            Admission::Start(ticket) => self.run(ticket).await,
            Admission::Join(ticket) => {
                tracing::debug!(
                    event = "fetch_joined",
                    index = ticket.request().index,
                    size = ticket.request().size,
                    "Joined in-flight fetch"
                );
                LoadOutcome::Joined
            }
            Admission::Rejected(err) => {
                tracing::warn!(
                    event = "request_rejected",
                    kind = err.kind(),
                    "Request rejected: {}",
                    err
                );
                LoadOutcome::Rejected(err)
            }
        }
    }

    async fn run(&self, ticket: Ticket) -> LoadOutcome {
        let request = ticket.request();
        tracing::debug!(
            event = "fetch_started",
            index = request.index,
            size = request.size,
            generation = ticket.generation(),
            "Fetching {}",
            request
        );

        let result = self.fetcher.fetch(request).await;
        if let Err(err) = &result {
            log_failure(err, ticket);
        }

        let completion = {
            let mut cache = self.lock();
            let completion = cache.complete(ticket, result);
            if completion == Completion::Applied {
                self.publish(&cache);
            }
            completion
        };

        match completion {
            Completion::Applied => LoadOutcome::Applied,
            Completion::Stale => {
                tracing::debug!(
                    event = "stale_result_discarded",
                    generation = ticket.generation(),
                    "Discarded result of superseded {}",
                    request
                );
                LoadOutcome::Stale
            }
        }
    }

    fn publish(&self, cache: &PageCache) {
        let state = cache.state();
        self.state_tx.send_if_modified(|current| {
            if current == state {
                false
            } else {
                *current = state.clone();
                true
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, PageCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Schema violations are contract breaks, not transient trouble.
fn log_failure(err: &FetchError, ticket: Ticket) {
    let request = ticket.request();
    match err {
        FetchError::MalformedResponse(detail) => tracing::error!(
            event = "malformed_response",
            index = request.index,
            size = request.size,
            "Response violated the page schema: {}",
            detail
        ),
        other => tracing::warn!(
            event = "fetch_failed",
            kind = other.kind(),
            retryable = other.is_retryable(),
            index = request.index,
            size = request.size,
            "Fetch failed: {}",
            other
        ),
    }
}
