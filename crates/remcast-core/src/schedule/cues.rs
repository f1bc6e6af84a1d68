//! Cue timing policy
//!
//! Expands each target window into a bounded run of evenly spaced future cue
//! instants. Cues landing in the past (or within the lead guard) are skipped
//! without cutting the rest of the window short; cues reaching the window
//! end stop the window's run.

use chrono::{DateTime, Duration, Utc};

use crate::model::{PlannedCue, TimeWindow};

/// Identifier prefix shared with the external notification scheduler
pub const CUE_ID_PREFIX: &str = "remcue.";

/// Candidates at or before `now + MIN_LEAD_SECS` are too soon to deliver
pub const MIN_LEAD_SECS: i64 = 5;

/// Plan cue instants for each window
///
/// Output preserves window order, then increasing time within each window.
/// A non-positive `cues_per_window` yields no cues. Every cue id is derived
/// from `(window index, cue index, epoch seconds)` so a scheduler can
/// replace pending cues idempotently.
pub fn plan_cues(
    windows: &[TimeWindow],
    cues_per_window: i32,
    spacing_secs: i64,
    now: DateTime<Utc>,
) -> Vec<PlannedCue> {
    if cues_per_window <= 0 {
        return Vec::new();
    }

    let lead_guard = now + Duration::seconds(MIN_LEAD_SECS);
    let mut cues = Vec::new();

    for (window_index, window) in windows.iter().enumerate() {
        for cue_index in 0..cues_per_window as usize {
            let fire_at = window.start + Duration::seconds(cue_index as i64 * spacing_secs);
            if fire_at >= window.end {
                break;
            }
            if fire_at <= lead_guard {
                continue;
            }
            cues.push(PlannedCue {
                id: format!(
                    "{}{}.{}.{}",
                    CUE_ID_PREFIX,
                    window_index,
                    cue_index,
                    fire_at.timestamp()
                ),
                window_index,
                cue_index,
                fire_at,
            });
        }
    }

    cues
}

// ============================================================================
// TESTS
// ============================================================================
