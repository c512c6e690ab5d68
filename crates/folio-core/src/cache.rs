//! # Page Cache
//!
//! Sequences fetches against Load State transitions for a single view.
//!
//! The cache never performs I/O itself. A caller asks for admission with
//! [`PageCache::request`], performs the fetch for the returned [`Ticket`],
//! and hands the outcome back through [`PageCache::complete`]. Every ticket
//! carries the generation it was issued under; only the ticket of the most
//! recently initiated fetch may mutate state. Outcomes of superseded tickets,
//! and of any ticket once the view has unmounted, are discarded.
//!
//! ## Duplicate Requests
//!
//! At most one fetch is tracked at a time. A request for the page that is
//! already in flight is handled by the instance's [`DuplicatePolicy`]:
//! - `Join`: the caller receives the existing ticket; no new fetch is issued.
//! - `Reject`: the caller receives `AlreadyLoading`; state is untouched.

use crate::envelope::PageEnvelope;
use crate::error::FetchError;
use crate::request::PageRequest;
use crate::state::LoadState;

// =============================================================================
// ADMISSION TYPES
// =============================================================================

/// How a cache treats a request for the page already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Share the in-flight fetch.
    #[default]
    Join,
    /// Refuse with `AlreadyLoading`.
    Reject,
}

/// Proof of admission for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    request: PageRequest,
}

impl Ticket {
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of asking the cache to load a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// A new fetch must be performed for this ticket.
    Start(Ticket),
    /// The same page is already in flight; no new fetch is needed.
    Join(Ticket),
    /// Nothing will be fetched.
    Rejected(FetchError),
}

/// Result of handing a fetch outcome back to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome became the current Load State.
    Applied,
    /// The ticket was superseded or the view unmounted; nothing changed.
    Stale,
}

// =============================================================================
// PAGE CACHE
// =============================================================================

/// Owner of one view's Load State.
#[derive(Debug)]
pub struct PageCache {
    state: LoadState,
    policy: DuplicatePolicy,
    generation: u64,
    in_flight: Option<Ticket>,
    last_request: Option<PageRequest>,
    mounted: bool,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCache {
    /// Create a mounted, idle cache that joins duplicate requests.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Join)
    }

    /// Create a mounted, idle cache with the given duplicate policy.
    #[must_use]
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            state: LoadState::Idle,
            policy,
            generation: 0,
            in_flight: None,
            last_request: None,
            mounted: true,
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Ticket of the fetch currently tracked, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    /// The last valid request admitted, used by `retry`.
    #[must_use]
    pub fn last_request(&self) -> Option<PageRequest> {
        self.last_request
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Ask to load page `index` with `size` records.
    ///
    /// Invalid arguments never reach a fetcher: the state moves straight to
    /// `Error(InvalidArgument)` and any in-flight fetch is superseded.
    pub fn request(&mut self, index: u64, size: u32) -> Admission {
        if !self.mounted {
            return Admission::Rejected(FetchError::Unmounted);
        }
        match PageRequest::new(index, size) {
            Ok(request) => self.admit(request),
            Err(err) => {
                self.in_flight = None;
                self.last_request = None;
                self.state = LoadState::Error(err.clone());
                Admission::Rejected(err)
            }
        }
    }

    /// Re-issue the last request after a failure.
    ///
    /// Only valid from `Error`; anything else is rejected without a state
    /// change.
    pub fn retry(&mut self) -> Admission {
        if !self.mounted {
            return Admission::Rejected(FetchError::Unmounted);
        }
        match (&self.state, self.last_request) {
            (LoadState::Error(_), Some(request)) => self.admit(request),
            _ => Admission::Rejected(FetchError::InvalidArgument(
                "retry is only valid after a failed fetch".to_string(),
            )),
        }
    }

    /// Hand back the outcome of the fetch performed for `ticket`.
    ///
    /// A successful envelope is checked against the ticket's request before
    /// it is accepted; a violation lands as `MalformedResponse`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<PageEnvelope, FetchError>,
    ) -> Completion {
        if !self.mounted || self.in_flight != Some(ticket) {
            return Completion::Stale;
        }
        self.in_flight = None;

        let checked = result.and_then(|envelope| {
            envelope.check_against(&ticket.request)?;
            Ok(envelope)
        });
        self.state = match checked {
            Ok(envelope) => LoadState::Loaded(envelope),
            Err(err) => LoadState::Error(err),
        };
        Completion::Applied
    }

    /// The consuming view is gone. Later completions are discarded and
    /// later requests are rejected.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.in_flight = None;
    }

    fn admit(&mut self, request: PageRequest) -> Admission {
        if let Some(ticket) = self.in_flight
            && ticket.request == request
        {
            return match self.policy {
                DuplicatePolicy::Join => Admission::Join(ticket),
                DuplicatePolicy::Reject => {
                    Admission::Rejected(FetchError::AlreadyLoading(request))
                }
            };
        }

        self.generation = self.generation.wrapping_add(1);
        let ticket = Ticket {
            generation: self.generation,
            request,
        };
        self.in_flight = Some(ticket);
        self.last_request = Some(request);
        self.state = LoadState::Loading(request);
        Admission::Start(ticket)
    }
}

// =============================================================================
// TESTS
// =============================================================================
