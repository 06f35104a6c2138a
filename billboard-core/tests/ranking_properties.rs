//! Property-based tests for ranking and request counting.
//!
//! # Invariants tested
//!
//! - **Sorted output:** `top_k` is ordered by descending request count.
//! - **Bounded length:** `top_k(k)` returns `min(k, len)` items.
//! - **Stable ties:** equal counts keep their input order.
//! - **No lost requests:** persisting after every request leaves the stored
//!   counter equal to the number of requests.
//! - **Peak is best:** the peak position is the minimum recorded position.

use billboard_core::{FileItemStore, Item, ItemId, ItemStore, RankedSet};
use camino::Utf8PathBuf;
use proptest::prelude::*;
use tempfile::TempDir;

fn items_from_counts(counts: &[u64]) -> Vec<Item> {
    counts
        .iter()
        .enumerate()
        .map(|(index, count)| {
            let id = ItemId::new(format!("item-{index:04}")).expect("generated id is valid");
            Item::new(id, None).with_times_requested(*count)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: every adjacent pair in `top_k` is non-increasing.
    #[test]
    fn top_k_is_sorted_descending(
        counts in prop::collection::vec(0_u64..50, 0..40),
        k in 0_usize..50,
    ) {
        let ranked = RankedSet::from_items(items_from_counts(&counts));
        let top = ranked.top_k(k);

        prop_assert_eq!(top.len(), k.min(counts.len()));
        for pair in top.windows(2) {
            if let [first, second] = pair {
                prop_assert!(first.times_requested() >= second.times_requested());
            }
        }
    }

    /// Property: among equal counts, earlier inputs rank first.
    #[test]
    fn ties_keep_input_order(counts in prop::collection::vec(0_u64..4, 1..30)) {
        let ranked = RankedSet::from_items(items_from_counts(&counts));

        for pair in ranked.top_k(counts.len()).windows(2) {
            if let [first, second] = pair
                && first.times_requested() == second.times_requested()
            {
                prop_assert!(first.id() < second.id());
            }
        }
    }

    /// Property: the peak position is the best position ever recorded.
    #[test]
    fn peak_is_minimum_position(positions in prop::collection::vec(1_u32..100, 1..20)) {
        let mut item = Item::new(ItemId::new("v1").expect("valid id"), None);
        for position in &positions {
            item.record_chart_position(*position);
        }

        prop_assert_eq!(item.peak_position(), positions.iter().min().copied());
        prop_assert_eq!(item.position_this_period(), positions.last().copied());
        let weeks = u32::try_from(positions.len() - 1).expect("small length");
        prop_assert_eq!(item.weeks_on_chart(), Some(weeks));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: N request-then-persist cycles store a counter of N.
    #[test]
    fn persisted_counter_matches_request_count(requests in 0_u64..40) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 path");
        let store = FileItemStore::open(root.join("items")).expect("open store");
        let id = ItemId::new("v1").expect("valid id");

        for _ in 0..requests {
            let mut item = store.get_or_create(&id, Some("Song")).expect("load");
            item.record_request();
            store.persist(&item).expect("persist");
        }

        let stored = store.load(&id).expect("reload").map_or(0, |item| item.times_requested());
        prop_assert_eq!(stored, requests);
    }
}
