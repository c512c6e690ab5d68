//! # Load State Tier Tests (L0-L3)
//!
//! End-to-end walks through the page cache and renderer, without I/O.
//!
//! ## Tiers
//! - L0: Decoding boundary
//! - L1: Transitions
//! - L2: Ordering and cancellation
//! - L3: Rendering

#![allow(clippy::panic)]

use folio_core::{
    Admission, Collection, Completion, DuplicatePolicy, FetchError, LoadState, PageCache,
    PageRequest, SessionContext, Ticket, View, decode_page, render,
};

fn start(cache: &mut PageCache, index: u64, size: u32) -> Ticket {
    match cache.request(index, size) {
        Admission::Start(ticket) => ticket,
        other => panic!("expected Start, got {other:?}"),
    }
}

// =============================================================================
// TIER L0: DECODING BOUNDARY
// =============================================================================

mod l0_decoding {
    use super::*;

    /// L0.1: A body missing `content` lands as Error, never Loaded.
    #[test]
    fn missing_content_becomes_error_state() {
        let mut cache = PageCache::new();
        let ticket = start(&mut cache, 0, 20);

        let result = decode_page(br#"{"totalPages": 2}"#);
        cache.complete(ticket, result);

        assert!(matches!(
            cache.state(),
            LoadState::Error(FetchError::MalformedResponse(_))
        ));
    }

    /// L0.2: The empty collection decodes to `{content: [], totalPages: 0}`.
    #[test]
    fn empty_collection_round_trips_through_wire() {
        let page = Collection::new().page(&PageRequest::first(20).expect("valid"));
        let bytes = serde_json::to_vec(&page).expect("encode");
        let decoded = decode_page(&bytes).expect("decode");

        assert!(decoded.content.is_empty());
        assert_eq!(decoded.total_pages, 0);
    }
}

// =============================================================================
// TIER L1: TRANSITIONS
// =============================================================================

mod l1_transitions {
    use super::*;

    /// L1.1: idle -> loading -> loaded -> loading -> error -> loading.
    #[test]
    fn full_lifecycle() {
        let collection = Collection::demo(30);
        let mut cache = PageCache::new();
        assert_eq!(cache.state(), &LoadState::Idle);

        let t0 = start(&mut cache, 0, 10);
        cache.complete(t0, Ok(collection.page(&t0.request())));
        assert!(cache.state().envelope().is_some());

        let t1 = start(&mut cache, 1, 10);
        assert_eq!(cache.state(), &LoadState::Loading(t1.request()));
        cache.complete(t1, Err(FetchError::Network("timeout".into())));
        assert!(cache.state().error().is_some());

        let Admission::Start(t2) = cache.retry() else {
            panic!("retry should start");
        };
        assert_eq!(t2.request(), t1.request());
        cache.complete(t2, Ok(collection.page(&t2.request())));
        assert_eq!(cache.state().envelope().map(|e| e.len()), Some(10));
    }

    /// L1.2: Join policy issues one ticket for concurrent identical requests.
    #[test]
    fn join_policy_deduplicates() {
        let mut cache = PageCache::with_policy(DuplicatePolicy::Join);
        let ticket = start(&mut cache, 4, 10);

        for _ in 0..3 {
            assert_eq!(cache.request(4, 10), Admission::Join(ticket));
        }
    }

    /// L1.3: Reject policy answers AlreadyLoading and leaves state alone.
    #[test]
    fn reject_policy_is_consistent() {
        let mut cache = PageCache::with_policy(DuplicatePolicy::Reject);
        let ticket = start(&mut cache, 4, 10);
        let before = cache.state().clone();

        for _ in 0..3 {
            assert!(matches!(
                cache.request(4, 10),
                Admission::Rejected(FetchError::AlreadyLoading(_))
            ));
        }
        assert_eq!(cache.state(), &before);
        assert_eq!(cache.in_flight(), Some(ticket));
    }
}

// =============================================================================
// TIER L2: ORDERING AND CANCELLATION
// =============================================================================

mod l2_ordering {
    use super::*;

    /// L2.1: A initiated, B initiated, B resolves, A resolves: B wins.
    #[test]
    fn older_fetch_resolving_late_is_discarded() {
        let collection = Collection::demo(50);
        let mut cache = PageCache::new();

        let a = start(&mut cache, 0, 10);
        let b = start(&mut cache, 3, 10);

        assert_eq!(
            cache.complete(b, Ok(collection.page(&b.request()))),
            Completion::Applied
        );
        assert_eq!(
            cache.complete(a, Ok(collection.page(&a.request()))),
            Completion::Stale
        );

        let first_id = cache.state().envelope().map(|e| e.content[0].id.value());
        assert_eq!(first_id, Some(31));
    }

    /// L2.2: An older failure resolving late does not overwrite a newer success.
    #[test]
    fn late_failure_is_discarded() {
        let mut cache = PageCache::new();
        let a = start(&mut cache, 0, 10);
        let b = start(&mut cache, 1, 10);

        cache.complete(b, Ok(Collection::demo(20).page(&b.request())));
        cache.complete(a, Err(FetchError::Remote(503)));

        assert!(cache.state().envelope().is_some());
    }

    /// L2.3: Unmounting while loading makes both outcomes unobservable.
    #[test]
    fn unmount_during_fetch() {
        let page = Collection::demo(3).page(&PageRequest::first(10).expect("valid"));
        for outcome in [Ok(page), Err(FetchError::Remote(500))] {
            let mut cache = PageCache::new();
            let ticket = start(&mut cache, 0, 10);
            cache.unmount();

            assert_eq!(cache.complete(ticket, outcome), Completion::Stale);
            assert!(matches!(cache.state(), LoadState::Loading(_)));
        }
    }
}

// =============================================================================
// TIER L3: RENDERING
// =============================================================================

mod l3_rendering {
    use super::*;

    /// L3.1: Empty collection renders the empty state.
    #[test]
    fn empty_collection_renders_empty_view() {
        let mut cache = PageCache::new();
        let ticket = start(&mut cache, 0, 20);
        cache.complete(ticket, Ok(Collection::new().page(&ticket.request())));

        let view = render(cache.state(), &SessionContext::anonymous());
        assert!(matches!(view, View::Empty { .. }));
    }

    /// L3.2: Every error kind renders a message free of raw detail.
    #[test]
    fn every_error_renders_readable_message() {
        let detail = "xyzzy-internal-detail";
        let errors = [
            FetchError::InvalidArgument(detail.into()),
            FetchError::Network(detail.into()),
            FetchError::Remote(500),
            FetchError::MalformedResponse(detail.into()),
            FetchError::Unmounted,
        ];
        for err in errors {
            let view = render(&LoadState::Error(err), &SessionContext::anonymous());
            let View::Failure { message, .. } = view else {
                panic!("expected failure view");
            };
            assert!(!message.is_empty());
            assert!(!message.contains(detail));
        }
    }
}
