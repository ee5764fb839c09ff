//! Property tests for screen and tab operations

use std::collections::BTreeSet;

use panedeck_core::workspace::{
    MetaBagResolver, SequentialIdSource, TabId, TabOverrides, WorkspaceStore, left_neighbor_index,
};
use proptest::prelude::*;

use super::{apply, assert_consistent, location, new_store, ops_strategy};

/// A store with one screen holding `count` tabs, the last one active.
fn store_with_tabs(count: usize) -> WorkspaceStore {
    let mut store = new_store();
    let screen = store.active_screen_id().unwrap();
    for i in 0..count {
        store.open_route_tab(screen, &location(&format!("/t{i}")), TabOverrides::none());
    }
    store
}

fn all_tab_ids(store: &WorkspaceStore) -> BTreeSet<TabId> {
    store.screens().flat_map(|s| s.tab_ids()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The active screen and every active tab name live entries after any
    /// sequence of operations.
    #[test]
    fn active_ids_stay_valid(ops in ops_strategy(50)) {
        let mut store = new_store();
        for op in &ops {
            apply(&mut store, op);
            assert_consistent(&store)?;
            let active = store.active_screen_id().unwrap();
            prop_assert!(store.screen(active).is_some());
            for screen in store.screens() {
                match screen.active_tab_id() {
                    Some(tab) => prop_assert!(screen.contains_tab(tab)),
                    None => prop_assert!(screen.is_empty()),
                }
            }
        }
    }

    /// Tab ids stay unique across the whole workspace.
    #[test]
    fn tab_ids_are_unique(ops in ops_strategy(50)) {
        let mut store = new_store();
        for op in &ops {
            apply(&mut store, op);
        }
        let count: usize = store.screens().map(|s| s.tab_count()).sum();
        prop_assert_eq!(all_tab_ids(&store).len(), count);
    }

    /// Closing the active tab activates its left neighbour, or the new
    /// first tab when the first was closed.
    #[test]
    fn closing_active_tab_selects_left_neighbour(count in 2usize..8, pick in any::<usize>()) {
        let mut store = store_with_tabs(count);
        let screen_id = store.active_screen_id().unwrap();
        let ids = store.screen(screen_id).unwrap().tab_ids();
        let index = pick % count;
        store.set_active_tab(screen_id, ids[index]);

        let closed = store.close_tab(screen_id, ids[index]).unwrap();

        let expected = ids[if index == 0 { 1 } else { index - 1 }];
        prop_assert_eq!(closed.next_active, Some(expected));
        prop_assert_eq!(store.screen(screen_id).unwrap().active_tab_id(), Some(expected));
        prop_assert_eq!(left_neighbor_index(index, count - 1), Some(index.saturating_sub(1)));
    }

    /// Closing an inactive tab leaves the active tab alone.
    #[test]
    fn closing_inactive_tab_keeps_selection(count in 2usize..8, pick in any::<usize>()) {
        let mut store = store_with_tabs(count);
        let screen_id = store.active_screen_id().unwrap();
        let ids = store.screen(screen_id).unwrap().tab_ids();
        let active = *ids.last().unwrap();
        let victim = ids[pick % (count - 1)];

        store.close_tab(screen_id, victim).unwrap();

        prop_assert_eq!(store.screen(screen_id).unwrap().active_tab_id(), Some(active));
    }

    /// Reordering is a permutation: the set of tabs is unchanged and the
    /// moved tab lands at the requested index.
    #[test]
    fn reorder_is_a_permutation(count in 1usize..8, from in any::<usize>(), to in any::<usize>()) {
        let mut store = store_with_tabs(count);
        let screen_id = store.active_screen_id().unwrap();
        let before = store.screen(screen_id).unwrap().tab_ids();
        let (from, to) = (from % count, to % count);

        prop_assert!(store.reorder_tabs(screen_id, from, to));

        let after = store.screen(screen_id).unwrap().tab_ids();
        prop_assert_eq!(after[to], before[from]);
        let mut sorted_before = before.clone();
        let mut sorted_after = after.clone();
        sorted_before.sort();
        sorted_after.sort();
        prop_assert_eq!(sorted_before, sorted_after);
    }

    /// Out-of-range reorders change nothing.
    #[test]
    fn reorder_out_of_range_is_refused(count in 1usize..6, extra in 0usize..4) {
        let mut store = store_with_tabs(count);
        let screen_id = store.active_screen_id().unwrap();
        let before = store.screen(screen_id).unwrap().tab_ids();
        let revision = store.revision();

        prop_assert!(!store.reorder_tabs(screen_id, count + extra, 0));

        prop_assert_eq!(store.screen(screen_id).unwrap().tab_ids(), before);
        prop_assert_eq!(store.revision(), revision);
    }

    /// Moving keeps the total number of tabs; cloning adds exactly one.
    #[test]
    fn move_and_clone_cardinality(count in 1usize..6, pick in any::<usize>(), index in 0usize..8) {
        let mut store = store_with_tabs(count);
        let source = store.active_screen_id().unwrap();
        let target = store.add_screen(Vec::new(), None).id;
        let total = store.tab_count();
        let tab = store.screen(source).unwrap().tab_ids()[pick % count];

        let cloned = store.clone_tab_to_screen(tab, source, target, index).unwrap();
        prop_assert_eq!(store.tab_count(), total + 1);
        prop_assert_ne!(cloned.tab_id, tab);
        let (_, copy) = store.find_tab(cloned.tab_id).unwrap();
        let (_, original) = store.find_tab(tab).unwrap();
        prop_assert_eq!(&copy.route, &original.route);
        prop_assert_eq!(&copy.title, &original.title);

        let moved = store.move_tab_to_screen(tab, source, target, index).unwrap();
        prop_assert_eq!(store.tab_count(), total + 1);
        prop_assert_eq!(store.screen_of_tab(tab), Some(target));
        prop_assert_eq!(store.active_screen_id(), Some(target));
        prop_assert_eq!(store.screen(target).unwrap().active_tab_id(), Some(tab));
        prop_assert_eq!(moved.source_screen_removed, count == 1);
        assert_consistent(&store)?;
    }

    /// Operations naming unknown or stale ids are no-ops.
    #[test]
    fn stale_ids_do_not_mutate(ops in ops_strategy(20)) {
        let mut store = new_store();
        for op in &ops {
            apply(&mut store, op);
        }
        // Ids from a far-away range are never handed out by `store`
        let mut other = WorkspaceStore::with_sources(
            SequentialIdSource::starting_at(1 << 100),
            MetaBagResolver::default(),
        );
        let stranger_screen = other.add_screen(Vec::new(), None).id;
        let ghost_tab = other
            .open_route_tab(stranger_screen, &location("/ghost"), TabOverrides::none())
            .unwrap()
            .id;

        let revision = store.revision();
        let active = store.active_screen_id().unwrap();
        prop_assert!(store.remove_screen(stranger_screen).is_none());
        prop_assert!(!store.set_active_screen(stranger_screen));
        prop_assert!(store.close_tab(active, ghost_tab).is_none());
        prop_assert!(!store.set_active_tab(active, ghost_tab));
        prop_assert!(store.move_tab_to_screen(ghost_tab, active, stranger_screen, 0).is_none());
        prop_assert!(store.update_tab(ghost_tab, TabOverrides::none().with_title("x")).is_none());
        prop_assert_eq!(store.revision(), revision);
    }
}

#[test]
fn split_clones_active_tab() {
    let mut store = new_store();
    let first = store.active_screen_id().unwrap();
    let original = store
        .open_route_tab(first, &location("/page/42"), TabOverrides::none())
        .unwrap()
        .clone();

    let second = store.add_screen(Vec::new(), None).id;

    let copy = store.screen(second).unwrap().active_tab().unwrap().clone();
    assert_ne!(copy.id, original.id);
    assert_eq!(copy.route, original.route);
    assert_eq!(copy.title, original.title);
    assert!((store.screen_width(first).unwrap() - 50.0).abs() < 1e-9);
    assert!((store.screen_width(second).unwrap() - 50.0).abs() < 1e-9);
    assert_eq!(store.active_screen_id(), Some(second));
}

#[test]
fn closing_last_tab_of_last_screen_keeps_screen() {
    let mut store = store_with_tabs(1);
    let screen_id = store.active_screen_id().unwrap();
    let tab = store.active_tab().unwrap().id;

    let closed = store.close_tab(screen_id, tab).unwrap();

    assert!(!closed.screen_removed);
    assert_eq!(closed.next_active, None);
    assert_eq!(store.screen_count(), 1);
    assert!(store.screen(screen_id).unwrap().is_empty());
    assert!(store.check_invariants().is_ok());
}

#[test]
fn only_tab_of_only_screen_cannot_be_dragged() {
    let mut store = store_with_tabs(1);
    let screen_id = store.active_screen_id().unwrap();
    assert!(!store.can_drag_tab(screen_id));

    store.add_screen(Vec::new(), None);
    assert!(store.can_drag_tab(screen_id));
}
