//! Property-based tests for bookmark deduplication.
//!
//! For any sequence of bookmark requests, the bookmark list holds each URL
//! once, in first-request order, and every repeat reports it was already
//! bookmarked.

use gove::managers::session_store::{BookmarkOutcome, SessionState, SessionStoreTrait};
use proptest::prelude::*;

fn arb_urls() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (0..8u8).prop_map(|n| format!("https://site{}.test/", n)),
        1..50,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn bookmarks_are_deduplicated_in_first_seen_order(urls in arb_urls()) {
        let mut session = SessionState::new();
        let mut expected: Vec<String> = Vec::new();

        for url in &urls {
            let outcome = session.add_bookmark(url);
            if expected.contains(url) {
                prop_assert_eq!(outcome, BookmarkOutcome::AlreadyBookmarked);
            } else {
                prop_assert_eq!(outcome, BookmarkOutcome::Added);
                expected.push(url.clone());
            }
        }

        prop_assert_eq!(session.bookmarks(), expected.as_slice());
    }

    #[test]
    fn bookmarking_never_touches_history(urls in arb_urls()) {
        let mut session = SessionState::new();
        for url in &urls {
            session.add_bookmark(url);
        }
        prop_assert!(session.history().is_empty());
    }
}
