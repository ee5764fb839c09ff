//! Property tests for screen width allocation

use panedeck_core::workspace::width::{
    FULL_WIDTH_PERCENT, is_normalized, normalize, resize_pair,
};
use panedeck_core::workspace::{MIN_SCREEN_WIDTH_PERCENT, WIDTH_EPSILON};
use proptest::prelude::*;

use super::{apply, assert_consistent, new_store, ops_strategy, width_sum};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Normalizing any positive widths yields a sum of 100 and keeps the
    /// proportions between screens.
    #[test]
    fn normalize_sums_to_full_width(widths in prop::collection::vec(0.5..500.0f64, 1..8)) {
        let mut normalized = widths.clone();
        normalize(normalized.iter_mut());

        prop_assert!(is_normalized(normalized.iter().copied()));
        let total: f64 = widths.iter().sum();
        for (before, after) in widths.iter().zip(&normalized) {
            let expected = before / total * FULL_WIDTH_PERCENT;
            prop_assert!((after - expected).abs() < 1e-6);
        }
    }

    /// Resizing a pair conserves the pair's total and keeps both sides at
    /// or above the effective minimum.
    #[test]
    fn resize_pair_conserves_total(
        start_a in 1.0..90.0f64,
        start_b in 1.0..90.0f64,
        delta in -200.0..200.0f64,
    ) {
        let (a, b) = resize_pair(start_a, start_b, delta, MIN_SCREEN_WIDTH_PERCENT).unwrap();
        let total = start_a + start_b;
        let min = MIN_SCREEN_WIDTH_PERCENT.min(total / 2.0);

        prop_assert!((a + b - total).abs() < WIDTH_EPSILON);
        prop_assert!(a >= min - WIDTH_EPSILON);
        prop_assert!(b >= min - WIDTH_EPSILON);
    }

    /// Repeating the same drag from the same start widths always lands on
    /// the same result.
    #[test]
    fn resize_from_start_widths_is_stable(delta in -100.0..100.0f64, steps in 1usize..20) {
        let mut last = None;
        for _ in 0..steps {
            let next = resize_pair(50.0, 50.0, delta, MIN_SCREEN_WIDTH_PERCENT);
            if let Some(previous) = last {
                prop_assert_eq!(previous, next);
            }
            last = Some(next);
        }
    }

    /// Widths always sum to 100 after any sequence of store operations.
    #[test]
    fn widths_sum_to_full_after_operations(ops in ops_strategy(40)) {
        let mut store = new_store();
        for op in &ops {
            apply(&mut store, op);
            assert_consistent(&store)?;
        }
        prop_assert!((width_sum(&store) - FULL_WIDTH_PERCENT).abs() <= WIDTH_EPSILON);
    }

    /// Setting one screen's width keeps every other screen at or above the
    /// minimum.
    #[test]
    fn set_screen_width_respects_minimum(
        screens in 2usize..6,
        pick in any::<usize>(),
        requested in -50.0..150.0f64,
    ) {
        let mut store = new_store();
        for _ in 1..screens {
            store.add_screen(Vec::new(), None);
        }
        let ids = store.screen_ids();
        let target = ids[pick % ids.len()];

        let applied = store.set_screen_width(target, requested).unwrap();
        assert_consistent(&store)?;

        let min = MIN_SCREEN_WIDTH_PERCENT.min(FULL_WIDTH_PERCENT / screens as f64);
        prop_assert!(applied >= min - WIDTH_EPSILON);
        for screen in store.screens().filter(|s| s.id != target) {
            prop_assert!(screen.width() >= min - 1e-6, "{} below {}", screen.width(), min);
        }
    }

    /// Starting from uneven widths, setting one screen's width never pushes
    /// an already narrow screen below the minimum.
    #[test]
    fn set_screen_width_respects_minimum_from_uneven_widths(
        screens in 2usize..6,
        resizes in prop::collection::vec((any::<usize>(), -80.0..80.0f64), 0..8),
        pick in any::<usize>(),
        requested in -50.0..150.0f64,
    ) {
        let mut store = new_store();
        for _ in 1..screens {
            store.add_screen(Vec::new(), None);
        }
        let ids = store.screen_ids();
        for (index, delta) in resizes {
            let left = ids[index % (ids.len() - 1)];
            let right = ids[index % (ids.len() - 1) + 1];
            let start_left = store.screen_width(left).unwrap();
            let start_right = store.screen_width(right).unwrap();
            let _ = store.resize_screens(left, right, delta, start_left, start_right);
        }
        let target = ids[pick % ids.len()];

        store.set_screen_width(target, requested).unwrap();
        assert_consistent(&store)?;

        let min = MIN_SCREEN_WIDTH_PERCENT.min(FULL_WIDTH_PERCENT / screens as f64);
        for screen in store.screens() {
            prop_assert!(screen.width() >= min - 1e-6, "{} below {}", screen.width(), min);
        }
    }
}

#[test]
fn widening_one_screen_holds_narrow_screen_at_minimum() {
    let mut store = new_store();
    let a = store.active_screen_id().unwrap();
    let b = store.add_screen(Vec::new(), None).id;
    let c = store.add_screen(Vec::new(), None).id;

    store.set_screen_width(c, 10.0).unwrap();
    assert!((store.screen_width(a).unwrap() - 45.0).abs() < WIDTH_EPSILON);
    assert!((store.screen_width(b).unwrap() - 45.0).abs() < WIDTH_EPSILON);

    let applied = store.set_screen_width(a, 80.0).unwrap();

    assert!((applied - 80.0).abs() < WIDTH_EPSILON);
    assert!((store.screen_width(b).unwrap() - 10.0).abs() < WIDTH_EPSILON);
    assert!((store.screen_width(c).unwrap() - 10.0).abs() < WIDTH_EPSILON);
}

#[test]
fn resize_past_limit_clamps_to_minimum() {
    let mut store = new_store();
    let a = store.active_screen_id().unwrap();
    let b = store.add_screen(Vec::new(), None).id;

    let applied = store.resize_screens(a, b, 60.0, 50.0, 50.0).unwrap();

    assert!((applied - 90.0).abs() < WIDTH_EPSILON);
    assert!((store.screen_width(b).unwrap() - 10.0).abs() < WIDTH_EPSILON);
}

#[test]
fn unknown_screen_width_is_none() {
    let mut store = new_store();
    let other = store.add_screen(Vec::new(), None).id;
    store.remove_screen(other).unwrap();
    assert_eq!(store.set_screen_width(other, 40.0), None);
    assert_eq!(store.screen_width(other), None);
}
