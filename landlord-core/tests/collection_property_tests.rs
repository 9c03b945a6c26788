use landlord_core::{
    total_pages, CollectionError, Landlord, LandlordColumn, PageRequest, PagedCollection,
    RecordLocator, SortDirection, Sortable,
};
use landlord_test_utils::fixtures;
use landlord_test_utils::generators::{arb_column, arb_landlords, arb_page_size};
use landlord_test_utils::MockPageSource;
use proptest::prelude::*;
use std::future::Future;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}

fn ids(collection: &PagedCollection<Landlord>) -> Vec<i64> {
    collection.rows().map(|l| l.landlord_id).collect()
}

#[derive(Debug, Clone)]
enum Step {
    Advance(usize),
    Retreat(usize),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1usize..7).prop_map(Step::Advance),
        (1usize..7).prop_map(Step::Retreat),
    ]
}

// ============================================================================
// Scenario: twelve landlords, five per page
// ============================================================================

#[test]
fn twelve_records_five_per_page_is_three_pages() {
    assert_eq!(total_pages(12, 5), 3);

    let source = fixtures::twelve_by_five();
    let mut collection = PagedCollection::<Landlord>::new(5);
    block_on(collection.load_page(&source, 0)).unwrap();
    assert_eq!(collection.total_pages(), 3);
    assert_eq!(collection.advance(5), Some(2));
}

#[test]
fn locate_on_third_page_visits_pages_in_order() {
    let source = fixtures::twelve_by_five();
    let located = block_on(RecordLocator::new(&source).locate(11)).unwrap();
    assert_eq!(located.record.landlord_id, 11);
    assert_eq!(located.page_index, 2);
    assert_eq!(located.pages_visited, 3);
    assert_eq!(
        source.requests(),
        vec![
            PageRequest::Index(0),
            PageRequest::Cursor(MockPageSource::<Landlord>::cursor_for(1)),
            PageRequest::Cursor(MockPageSource::<Landlord>::cursor_for(2)),
        ]
    );
}

#[test]
fn locate_missing_id_reports_not_found_after_all_pages() {
    let source = fixtures::twelve_by_five();
    let err = block_on(RecordLocator::new(&source).locate(404)).unwrap_err();
    assert_eq!(err, CollectionError::NotFound { id: 404 });
    assert_eq!(source.fetch_count(), 3);
}

#[test]
fn locate_stops_on_network_failure() {
    let source = fixtures::twelve_by_five().with_failure_at(1);
    let err = block_on(RecordLocator::new(&source).locate(11)).unwrap_err();
    assert!(matches!(err, CollectionError::Network(_)));
    assert_eq!(source.fetch_count(), 2);
}

#[test]
fn out_of_range_page_surfaces_error_and_keeps_page() {
    let source = fixtures::twelve_by_five();
    let mut collection = PagedCollection::<Landlord>::new(5);
    block_on(collection.load_page(&source, 1)).unwrap();
    let before = ids(&collection);

    assert!(block_on(collection.load_page(&source, 9)).is_err());
    assert_eq!(ids(&collection), before);
    assert_eq!(collection.current_page_index(), 1);
    assert!(collection.error().is_some_and(|e| e.contains("Invalid page")));
}

proptest! {
    // ========================================================================
    // Loading the same page twice is idempotent
    // ========================================================================

    #[test]
    fn load_page_twice_is_idempotent(
        records in arb_landlords(0, 30),
        page_size in arb_page_size(),
        page_pick in 0usize..10,
    ) {
        let source = MockPageSource::new(records, page_size);
        let index = page_pick % source.page_count();
        let mut collection = PagedCollection::<Landlord>::new(page_size);

        block_on(collection.load_page(&source, index)).unwrap();
        let first_rows = ids(&collection);
        let first_page = collection.page().cloned();
        let first_paging = collection.paging();

        block_on(collection.load_page(&source, index)).unwrap();
        prop_assert_eq!(ids(&collection), first_rows);
        prop_assert_eq!(collection.page().cloned(), first_page);
        prop_assert_eq!(collection.paging(), first_paging);
    }

    // ========================================================================
    // Sorting is stable among ties
    // ========================================================================

    #[test]
    fn sort_preserves_prior_order_among_ties(
        records in arb_landlords(1, 12),
        first in arb_column(),
        second in arb_column(),
    ) {
        let page_size = records.len();
        let source = MockPageSource::new(records, page_size);
        let mut collection = PagedCollection::<Landlord>::new(page_size);
        block_on(collection.load_page(&source, 0)).unwrap();

        collection.sort_by(first);
        let prior = ids(&collection);
        let state = collection.sort_by(second);

        let rows: Vec<&Landlord> = collection.rows().collect();
        for pair in rows.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let ordering = a.sort_value(second).cmp(&b.sort_value(second));
            match state.direction {
                SortDirection::Ascending => prop_assert!(ordering.is_le()),
                SortDirection::Descending => prop_assert!(ordering.is_ge()),
                SortDirection::None => prop_assert!(false, "sort_by never yields None"),
            }
            if ordering.is_eq() {
                let pos_a = prior.iter().position(|id| *id == a.landlord_id);
                let pos_b = prior.iter().position(|id| *id == b.landlord_id);
                prop_assert!(pos_a < pos_b, "tie order changed for {} and {}", a.landlord_id, b.landlord_id);
            }
        }
    }

    // ========================================================================
    // Direction toggles on the same column, resets on a new one
    // ========================================================================

    #[test]
    fn sort_direction_transitions(first in arb_column(), second in arb_column()) {
        let mut collection = PagedCollection::<Landlord>::new(5);
        prop_assert_eq!(collection.sort_by(first).direction, SortDirection::Ascending);
        prop_assert_eq!(collection.sort_by(first).direction, SortDirection::Descending);
        prop_assert_eq!(collection.sort_by(first).direction, SortDirection::Ascending);

        let state = collection.sort_by(second);
        if second == first {
            prop_assert_eq!(state.direction, SortDirection::Descending);
        } else {
            prop_assert_eq!(state.direction, SortDirection::Ascending);
            prop_assert_eq!(state.column, Some(second));
        }
    }

    #[test]
    fn sorting_only_permutes_the_loaded_page(
        records in arb_landlords(0, 12),
        columns in proptest::collection::vec(arb_column(), 0..6),
    ) {
        let page_size = records.len().max(1);
        let source = MockPageSource::new(records, page_size);
        let mut collection = PagedCollection::<Landlord>::new(page_size);
        block_on(collection.load_page(&source, 0)).unwrap();
        let mut expected = ids(&collection);

        for column in columns {
            collection.sort_by(column);
        }
        let mut actual = ids(&collection);
        expected.sort();
        actual.sort();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(source.fetch_count(), 1);
    }

    // ========================================================================
    // Advance / retreat stay within [0, total_pages - 1]
    // ========================================================================

    #[test]
    fn advance_and_retreat_stay_in_bounds(
        records in arb_landlords(1, 40),
        page_size in arb_page_size(),
        steps in proptest::collection::vec(arb_step(), 1..20),
    ) {
        let source = MockPageSource::new(records, page_size);
        let mut collection = PagedCollection::<Landlord>::new(page_size);
        block_on(collection.load_page(&source, 0)).unwrap();

        for step in steps {
            let target = match step {
                Step::Advance(n) => collection.advance(n),
                Step::Retreat(n) => collection.retreat(n),
            };
            if let Some(target) = target {
                prop_assert!(target < collection.total_pages());
                block_on(collection.load_page(&source, target)).unwrap();
            }
            prop_assert!(collection.current_page_index() < collection.total_pages());
        }
    }

    // ========================================================================
    // Locator visits exactly the pages up to the target
    // ========================================================================

    #[test]
    fn locator_fetch_count_matches_target_page(
        records in arb_landlords(1, 30),
        page_size in arb_page_size(),
        pick in any::<prop::sample::Index>(),
    ) {
        let target = pick.get(&records).landlord_id;
        let position = records.iter().position(|l| l.landlord_id == target).unwrap_or(0);
        let source = MockPageSource::new(records, page_size);

        let located = block_on(RecordLocator::new(&source).locate(target)).unwrap();
        prop_assert_eq!(located.record.landlord_id, target);
        prop_assert_eq!(located.page_index, position / page_size);
        prop_assert_eq!(source.fetch_count(), position / page_size + 1);
    }

    #[test]
    fn locator_missing_id_walks_every_page(
        records in arb_landlords(0, 30),
        page_size in arb_page_size(),
    ) {
        let source = MockPageSource::new(records, page_size);
        let err = block_on(RecordLocator::new(&source).locate(-1)).unwrap_err();
        prop_assert_eq!(err, CollectionError::NotFound { id: -1 });
        prop_assert_eq!(source.fetch_count(), source.page_count());
    }
}

#[test]
fn every_column_is_sortable() {
    let source = fixtures::twelve_by_five();
    let mut collection = PagedCollection::<Landlord>::new(5);
    block_on(collection.load_page(&source, 0)).unwrap();
    for column in LandlordColumn::all() {
        assert!(collection.sort_by(*column).is_sorted_by(*column));
    }
}
