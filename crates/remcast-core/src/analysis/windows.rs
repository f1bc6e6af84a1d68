//! Target window selection
//!
//! Finds local maxima in the probability curve, suppresses peaks that crowd
//! a stronger neighbor, and converts the survivors into absolute time
//! windows anchored at the predicted bedtime.

use chrono::{DateTime, Duration, Utc};

use crate::model::TimeWindow;

/// Bins skipped at the front of the curve (sleep-onset non-REM region)
pub const IGNORE_PREFIX_BINS: usize = 2;

/// Minimum bin distance between two selected peaks (~90 min at 30-min bins)
pub const MIN_SEPARATION_BINS: usize = 3;

/// Half-width of each emitted window, in bins around its peak
pub const WINDOW_RADIUS_BINS: usize = 1;

/// Select up to `max_windows` disjoint target windows from the curve
///
/// Peaks are local maxima under relaxed comparisons: plateau bins and
/// boundary bins qualify. Selection is greedy by descending value with a
/// minimum bin separation; the stable sort makes plateau resolution
/// deterministic (leftmost qualifying bin wins). Windows are returned
/// sorted by start ascending.
pub fn select_top_windows(
    curve: &[f64],
    expected_sleep_start: DateTime<Utc>,
    bin_minutes: i64,
    max_windows: usize,
) -> Vec<TimeWindow> {
    let n = curve.len();
    if n == 0 {
        return Vec::new();
    }

    let ignore_prefix = IGNORE_PREFIX_BINS.min(n);

    // Local maxima; boundary bins compare against a sentinel below any value
    let mut peaks: Vec<(usize, f64)> = Vec::new();
    for i in ignore_prefix..n {
        let left = if i > 0 { curve[i - 1] } else { -1.0 };
        let right = if i < n - 1 { curve[i + 1] } else { -1.0 };
        if curve[i] >= left && curve[i] >= right {
            peaks.push((i, curve[i]));
        }
    }

    // Stable sort: equal-height peaks keep left-to-right discovery order
    peaks.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut chosen: Vec<usize> = Vec::new();
    for (idx, _) in peaks {
        if chosen.len() >= max_windows {
            break;
        }
        let separated = chosen
            .iter()
            .all(|c| c.abs_diff(idx) >= MIN_SEPARATION_BINS);
        if separated {
            chosen.push(idx);
        }
    }

    let bin_secs = bin_minutes * 60;
    let mut windows: Vec<TimeWindow> = chosen
        .into_iter()
        .map(|peak| {
            let start_bin = peak.saturating_sub(WINDOW_RADIUS_BINS);
            let end_bin = (peak + WINDOW_RADIUS_BINS + 1).min(n);
            TimeWindow::new(
                expected_sleep_start + Duration::seconds(start_bin as i64 * bin_secs),
                expected_sleep_start + Duration::seconds(end_bin as i64 * bin_secs),
            )
        })
        .collect();

    windows.sort_by_key(|w| w.start);
    windows
}

// ============================================================================
// TESTS
// ============================================================================
