//! Property tests for tab drag-and-drop

use panedeck_core::drag::{
    DragDropController, DragPayload, DropOutcome, DropRejection, DropTarget, Edge, insert_index,
    reorder_index, resolve_drop,
};
use panedeck_core::input::{Modifiers, PointerEvent, PointerId};
use panedeck_core::workspace::{ScreenId, TabId, TabOverrides, WorkspaceStore};
use proptest::prelude::*;

use super::{assert_consistent, location, new_store};

/// Two screens: X with `left` tabs and Y with `right` tabs.
fn two_screens(left: usize, right: usize) -> (WorkspaceStore, ScreenId, ScreenId) {
    let mut store = new_store();
    let x = store.active_screen_id().unwrap();
    for i in 0..left {
        store.open_route_tab(x, &location(&format!("/x{i}")), TabOverrides::none());
    }
    let y = store.add_screen(Vec::new(), None).id;
    // Drop the seed tab cloned from X so Y starts with exactly `right` tabs
    let seeded = store.screen(y).unwrap().tab_ids();
    for i in 0..right {
        store.open_route_tab(y, &location(&format!("/y{i}")), TabOverrides::none());
    }
    for tab in seeded {
        store.close_tab(y, tab);
    }
    (store, x, y)
}

fn payload(store: &WorkspaceStore, tab_id: TabId) -> DragPayload {
    let (screen, tab) = store.find_tab(tab_id).unwrap();
    DragPayload {
        tab_id,
        screen_id: screen.id,
        tab: tab.clone(),
        index: screen.tab_index(tab_id).unwrap(),
    }
}

fn edge_strategy() -> impl Strategy<Value = Edge> {
    prop_oneof![Just(Edge::Left), Just(Edge::Right)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A drop within the source screen is a permutation of its tabs and
    /// the dragged tab ends up where the indicator pointed.
    #[test]
    fn drop_within_screen_reorders(
        count in 2usize..7,
        source in any::<usize>(),
        target in any::<usize>(),
        edge in edge_strategy(),
    ) {
        let (mut store, x, _) = two_screens(count, 1);
        let before = store.screen(x).unwrap().tab_ids();
        let (source, target) = (source % count, target % count);
        let tab = before[source];
        let dragged = payload(&store, tab);

        let outcome = resolve_drop(
            &mut store,
            &dragged,
            DropTarget::TabZone { screen_id: x, index: target, edge },
            Modifiers::NONE,
        );

        let expected = reorder_index(source, insert_index(target, edge)).min(count - 1);
        let after = store.screen(x).unwrap().tab_ids();
        prop_assert_eq!(after.len(), before.len());
        prop_assert_eq!(after[expected], tab);
        if expected == source {
            prop_assert_eq!(outcome, DropOutcome::Unchanged);
            prop_assert_eq!(after, before);
        } else {
            prop_assert_eq!(outcome, DropOutcome::Reordered { screen_id: x, from: source, to: expected });
        }
        assert_consistent(&store)?;
    }

    /// Holding Ctrl or Meta over the source screen never copies: the
    /// screen keeps exactly the same set of tabs.
    #[test]
    fn modifiers_within_screen_keep_tab_set(
        count in 2usize..7,
        source in any::<usize>(),
        target in any::<usize>(),
        edge in edge_strategy(),
        meta in any::<bool>(),
    ) {
        let (mut store, x, _) = two_screens(count, 1);
        let before = store.screen(x).unwrap().tab_ids();
        let tab = before[source % count];
        let dragged = payload(&store, tab);
        let modifiers = if meta { Modifiers::META } else { Modifiers::CTRL };

        let outcome = resolve_drop(
            &mut store,
            &dragged,
            DropTarget::TabZone { screen_id: x, index: target % count, edge },
            modifiers,
        );

        prop_assert!(!matches!(outcome, DropOutcome::Cloned(_)), "{:?}", outcome);
        let mut after = store.screen(x).unwrap().tab_ids();
        let mut expected = before.clone();
        after.sort();
        expected.sort();
        prop_assert_eq!(after, expected);
        assert_consistent(&store)?;
    }

    /// A drop on another screen moves the tab there and keeps the number
    /// of tabs; holding Ctrl or Meta clones instead.
    #[test]
    fn drop_across_screens_moves_or_clones(
        left in 1usize..5,
        right in 1usize..5,
        source in any::<usize>(),
        clone in any::<bool>(),
        meta in any::<bool>(),
    ) {
        let (mut store, x, y) = two_screens(left, right);
        let tab = store.screen(x).unwrap().tab_ids()[source % left];
        let total = store.tab_count();
        let modifiers = match (clone, meta) {
            (false, _) => Modifiers::NONE,
            (true, false) => Modifiers::CTRL,
            (true, true) => Modifiers::META,
        };
        let dragged = payload(&store, tab);

        let outcome = resolve_drop(
            &mut store,
            &dragged,
            DropTarget::ScreenBody { screen_id: y },
            modifiers,
        );

        match outcome {
            DropOutcome::Cloned(transfer) => {
                prop_assert!(clone);
                prop_assert_eq!(store.tab_count(), total + 1);
                prop_assert_eq!(store.screen_of_tab(tab), Some(x));
                prop_assert_eq!(transfer.index, right);
            }
            DropOutcome::Moved(transfer) => {
                prop_assert!(!clone);
                prop_assert_eq!(store.tab_count(), total);
                prop_assert_eq!(store.screen_of_tab(tab), Some(y));
                prop_assert_eq!(transfer.source_screen_removed, left == 1);
            }
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
        prop_assert_eq!(store.active_screen_id(), Some(y));
        assert_consistent(&store)?;
    }

    /// The controller only drags once the pointer travelled past the
    /// threshold.
    #[test]
    fn drag_starts_past_threshold(dx in -20.0..20.0f64, dy in -20.0..20.0f64) {
        let (store, x, _) = two_screens(2, 1);
        let tab = store.screen(x).unwrap().tab_ids()[0];
        let pointer = PointerId(1);
        let mut controller = DragDropController::new();

        prop_assert!(controller.pointer_down(
            &store,
            &PointerEvent::mouse(pointer, 100.0, 10.0),
            x,
            tab,
            None,
        ));
        let dragging = controller.pointer_move(&PointerEvent::mouse(pointer, 100.0 + dx, 10.0 + dy));

        prop_assert_eq!(dragging, dx.hypot(dy) >= controller.threshold_px());
    }
}

/// Dragging T2 onto the left edge of U1 moves it to the front of Y, and X
/// falls back to T1.
#[test]
fn drop_on_left_edge_of_other_screen_tab() {
    let (mut store, x, y) = two_screens(2, 1);
    let t = store.screen(x).unwrap().tab_ids();
    let (t1, t2) = (t[0], t[1]);
    let u1 = store.screen(y).unwrap().tab_ids()[0];
    store.set_active_screen(x);
    store.set_active_tab(x, t2);

    let pointer = PointerId(7);
    let mut controller = DragDropController::new();
    assert!(controller.pointer_down(&store, &PointerEvent::mouse(pointer, 50.0, 5.0), x, t2, None));
    assert!(controller.pointer_move(&PointerEvent::mouse(pointer, 250.0, 5.0)));
    let target = DropTarget::TabZone {
        screen_id: y,
        index: 0,
        edge: Edge::Left,
    };
    assert!(controller.hover(pointer, Some(target)));

    let outcome = controller.drop(&mut store, pointer, target, Modifiers::NONE);

    assert!(matches!(outcome, DropOutcome::Moved(transfer) if transfer.index == 0));
    assert_eq!(store.screen(y).unwrap().tab_ids(), vec![t2, u1]);
    assert_eq!(store.screen(x).unwrap().tab_ids(), vec![t1]);
    assert_eq!(store.screen(x).unwrap().active_tab_id(), Some(t1));
    assert_eq!(store.screen(y).unwrap().active_tab_id(), Some(t2));
    assert!(controller.is_idle());
}

#[test]
fn stale_drop_is_rejected() {
    let (mut store, x, y) = two_screens(2, 1);
    let tab = store.screen(x).unwrap().tab_ids()[0];
    let stale = payload(&store, tab);
    store.close_tab(x, tab);

    let outcome = resolve_drop(
        &mut store,
        &stale,
        DropTarget::ScreenBody { screen_id: y },
        Modifiers::NONE,
    );
    assert_eq!(outcome, DropOutcome::Rejected(DropRejection::StaleTab));

    let live = store.screen(x).unwrap().tab_ids()[0];
    let live_payload = payload(&store, live);
    store.remove_screen(y);
    let outcome = resolve_drop(
        &mut store,
        &live_payload,
        DropTarget::ScreenBody { screen_id: y },
        Modifiers::NONE,
    );
    assert_eq!(outcome, DropOutcome::Rejected(DropRejection::UnknownScreen));
}

#[test]
fn drop_without_drag_is_rejected() {
    let (mut store, _, y) = two_screens(2, 1);
    let mut controller = DragDropController::new();
    let outcome = controller.drop(
        &mut store,
        PointerId(1),
        DropTarget::ScreenBody { screen_id: y },
        Modifiers::NONE,
    );
    assert_eq!(outcome, DropOutcome::Rejected(DropRejection::NotDragging));
}
