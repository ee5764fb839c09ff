//! Width allocation for screens
//!
//! Screen widths are percentages of the workspace. These functions keep
//! their sum at 100 and enforce a minimum pane width while the divider
//! between two adjacent screens is dragged. Clamping happens in percentage
//! space so behaviour does not depend on the viewport size.

/// Hard floor for a screen's width during a resize, in percent.
pub const MIN_SCREEN_WIDTH_PERCENT: f64 = 10.0;

/// Tolerance used when checking that widths sum to 100.
pub const WIDTH_EPSILON: f64 = 1e-6;

/// Total width every normalized set of screens sums to.
pub const FULL_WIDTH_PERCENT: f64 = 100.0;

/// Returns the width a screen counts as during normalization: its stored
/// width, or an even share when unassigned (zero).
#[must_use]
pub fn effective_width(width: f64, screen_count: usize) -> f64 {
    if width > 0.0 && width.is_finite() {
        width
    } else if screen_count > 0 {
        FULL_WIDTH_PERCENT / screen_count as f64
    } else {
        FULL_WIDTH_PERCENT
    }
}

/// Rescales widths so they sum to exactly 100, preserving proportions.
///
/// Zero widths are treated as `100 / n` for this pass. If the total is not
/// a positive finite number every width is reset to an even split.
pub fn normalize<'a>(widths: impl IntoIterator<Item = &'a mut f64>) {
    let mut widths: Vec<&mut f64> = widths.into_iter().collect();
    let count = widths.len();
    if count == 0 {
        return;
    }

    for width in &mut widths {
        **width = effective_width(**width, count);
    }

    let total: f64 = widths.iter().map(|w| **w).sum();
    if !(total.is_finite() && total > 0.0) {
        let even = FULL_WIDTH_PERCENT / count as f64;
        for width in &mut widths {
            **width = even;
        }
        return;
    }

    let factor = FULL_WIDTH_PERCENT / total;
    for width in &mut widths {
        **width *= factor;
    }

    // Absorb the rounding remainder into the last screen so the sum is exact
    let sum_but_last: f64 = widths[..count - 1].iter().map(|w| **w).sum();
    *widths[count - 1] = FULL_WIDTH_PERCENT - sum_but_last;
}

/// Returns true if the widths sum to 100 within [`WIDTH_EPSILON`].
#[must_use]
pub fn is_normalized(widths: impl IntoIterator<Item = f64>) -> bool {
    let total: f64 = widths.into_iter().sum();
    (total - FULL_WIDTH_PERCENT).abs() <= WIDTH_EPSILON
}

/// Returns the effective minimum width for a pair whose combined width is
/// `total`: `min_percent`, but never more than half of the pair.
#[must_use]
pub fn effective_min_width(total: f64, min_percent: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    min_percent.min(total / 2.0)
}

/// Computes new widths for two adjacent screens after moving the divider
/// between them by `delta_percent`.
///
/// Widths are always recomputed from the values captured when the drag
/// started, so repeated pointer moves do not accumulate rounding drift.
/// Returns `(new_a, new_b)` with `new_a + new_b == start_a + start_b`, or
/// `None` if the pair has no positive width or any input is not finite.
#[must_use]
pub fn resize_pair(
    start_a: f64,
    start_b: f64,
    delta_percent: f64,
    min_percent: f64,
) -> Option<(f64, f64)> {
    if !(start_a.is_finite() && start_b.is_finite() && delta_percent.is_finite()) {
        return None;
    }
    let total = start_a + start_b;
    if total <= 0.0 {
        return None;
    }

    let min = effective_min_width(total, min_percent.max(0.0));
    let max = total - min;
    let new_a = (start_a + delta_percent).clamp(min, max);
    Some((new_a, total - new_a))
}

/// Scales `widths` proportionally so they sum to `total`, keeping every
/// entry at or above `min`.
///
/// Entries that would fall below `min` are pinned there and the remainder
/// is shared among the others, repeating until nothing else drops below.
/// The caller guarantees `total >= min * widths.len()`.
#[must_use]
pub fn scale_with_minimum(widths: &[f64], total: f64, min: f64) -> Vec<f64> {
    let mut pinned = vec![false; widths.len()];
    let mut result = widths.to_vec();
    loop {
        let pinned_count = pinned.iter().filter(|p| **p).count();
        let free_target = (total - min * pinned_count as f64).max(0.0);
        let free_source: f64 = widths
            .iter()
            .zip(&pinned)
            .filter(|(_, pinned)| !**pinned)
            .map(|(w, _)| *w)
            .sum();
        let free_count = widths.len() - pinned_count;
        if free_count == 0 {
            return result;
        }

        let mut pinned_more = false;
        for (i, width) in widths.iter().enumerate() {
            if pinned[i] {
                result[i] = min;
                continue;
            }
            let scaled = if free_source > 0.0 {
                width * free_target / free_source
            } else {
                free_target / free_count as f64
            };
            if scaled < min {
                pinned[i] = true;
                pinned_more = true;
                result[i] = min;
            } else {
                result[i] = scaled;
            }
        }
        if !pinned_more {
            return result;
        }
    }
}

/// Width assigned to a newly added screen when `existing` screens are
/// already present.
#[must_use]
pub fn new_screen_width(existing: usize) -> f64 {
    FULL_WIDTH_PERCENT / (existing + 1) as f64
}
