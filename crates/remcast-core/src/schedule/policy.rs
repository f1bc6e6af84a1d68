//! Daily update gating
//!
//! The surrounding application runs the pipeline at most once per logical
//! day. This policy defines the local deadline by which the update should
//! have happened and whether a run is due now.

use chrono::{DateTime, Duration, FixedOffset, Utc};

/// Local hour of the daily update deadline
pub const DEADLINE_HOUR: i64 = 10;

/// Local minute of the daily update deadline
pub const DEADLINE_MINUTE: i64 = 0;

/// The deadline instant for "today" in local time
pub fn today_deadline(now: DateTime<Utc>, local_offset: FixedOffset) -> DateTime<Utc> {
    let local_now = now.with_timezone(&local_offset);
    let midnight = local_now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(local_offset).single());

    match midnight {
        Some(m) => {
            (m + Duration::minutes(DEADLINE_HOUR * 60 + DEADLINE_MINUTE)).with_timezone(&Utc)
        }
        None => now,
    }
}

/// Whether today's update should run now
///
/// Runs when `now` has reached the deadline and the last update (if any)
/// predates it.
pub fn should_run_now(
    last_updated_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    local_offset: FixedOffset,
) -> bool {
    let deadline = today_deadline(now, local_offset);
    if now < deadline {
        return false;
    }
    match last_updated_at {
        Some(last) => last < deadline,
        None => true,
    }
}

// ============================================================================
// TESTS
// ============================================================================
