//! Test Data Factory
//!
//! Builds realistic stage-interval streams: fragmented nights, naps, REM
//! segments at controlled offsets. All builders are deterministic so journey
//! tests can assert exact outcomes.

use chrono::{DateTime, Duration, TimeZone, Utc};
use remcast_core::{SleepNight, SleepStage, StageInterval};

/// The reference instant used across journey tests: 10:00 UTC, Feb 1 2026
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap()
}

/// A realistic night of samples starting `days_ago` nights back
///
/// Onset at 00:30 local so the whole episode shares one calendar day:
/// - 8 hours of core sleep, fragmented by a short gap
/// - REM segments placed at the given minute offsets (20 minutes each)
pub fn fragmented_night(days_ago: i64, rem_offsets_min: &[i64]) -> Vec<StageInterval> {
    let onset = Utc.with_ymd_and_hms(2026, 2, 1, 0, 30, 0).unwrap() - Duration::days(days_ago);
    let mut samples = vec![
        StageInterval::new(
            onset,
            onset + Duration::minutes(200),
            SleepStage::AsleepCore,
        ),
        // 10-minute wake gap, below the merge threshold
        StageInterval::new(
            onset + Duration::minutes(210),
            onset + Duration::minutes(480),
            SleepStage::AsleepCore,
        ),
    ];
    for &off in rem_offsets_min {
        samples.push(StageInterval::new(
            onset + Duration::minutes(off),
            onset + Duration::minutes(off + 20),
            SleepStage::AsleepRem,
        ));
    }
    samples
}

/// An afternoon nap on the same day as the night `days_ago` back
pub fn afternoon_nap(days_ago: i64) -> StageInterval {
    let start = Utc.with_ymd_and_hms(2026, 2, 1, 14, 0, 0).unwrap() - Duration::days(days_ago);
    StageInterval::new(start, start + Duration::minutes(45), SleepStage::Asleep)
}

/// A pre-built night record with all REM mass in one bin
pub fn night_with_rem_in_bin(days_ago: i64, bin: usize, seconds: f64) -> SleepNight {
    let start = Utc.with_ymd_and_hms(2026, 1, 31, 23, 0, 0).unwrap() - Duration::days(days_ago);
    let mut bins = vec![0.0; 20];
    bins[bin] = seconds;
    SleepNight::new(start, start + Duration::hours(8), seconds, bins)
}
