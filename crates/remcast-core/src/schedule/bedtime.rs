//! Bedtime prediction
//!
//! Anchors the probability curve to real clock time by predicting tonight's
//! sleep onset: the median minutes-since-midnight of recent onsets,
//! projected onto today (or tomorrow if that instant already passed).

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};

use crate::model::SleepNight;

/// How many recent nights inform the prediction
pub const BEDTIME_SAMPLE_NIGHTS: usize = 14;

/// Predict tonight's sleep onset from recent nights
///
/// `nights` is expected most-recent-first (the storage query order); only
/// the first [`BEDTIME_SAMPLE_NIGHTS`] entries are consulted. With no
/// history the prediction falls back to `now`.
pub fn infer_expected_sleep_start(
    nights: &[SleepNight],
    now: DateTime<Utc>,
    local_offset: FixedOffset,
) -> DateTime<Utc> {
    let recent = &nights[..nights.len().min(BEDTIME_SAMPLE_NIGHTS)];
    if recent.is_empty() {
        return now;
    }

    let mut minutes: Vec<i64> = recent
        .iter()
        .map(|n| {
            let local = n.sleep_start.with_timezone(&local_offset);
            i64::from(local.hour()) * 60 + i64::from(local.minute())
        })
        .collect();
    minutes.sort_unstable();
    let median = minutes[minutes.len() / 2];

    let local_now = now.with_timezone(&local_offset);
    let midnight = local_now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(local_offset).single());

    let Some(midnight) = midnight else {
        // Fixed offsets always resolve to a single local instant
        return now;
    };

    let mut candidate = (midnight + Duration::minutes(median)).with_timezone(&Utc);
    if candidate <= now {
        candidate += Duration::days(1);
    }
    candidate
}

// ============================================================================
// TESTS
// ============================================================================
