//! Sync module - Companion-device payloads
//!
//! A secondary device runs its own cue timing policy over the windows chosen
//! here. The wire shape is deliberately small: windows as epoch-second
//! pairs plus the two cue parameters, so the receiving side can rebuild
//! [`TimeWindow`]s and call [`crate::schedule::plan_cues`] locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::TimeWindow;

/// Windows and cue parameters for a companion device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSyncPayload {
    /// Target windows as (start, end) epoch-second pairs
    pub windows: Vec<(i64, i64)>,
    /// Cues the companion should place per window
    pub cues_per_window: i32,
    /// Spacing between cues in seconds
    pub spacing_secs: i64,
}

impl WindowSyncPayload {
    /// Encode windows for transport
    pub fn from_windows(windows: &[TimeWindow], cues_per_window: i32, spacing_secs: i64) -> Self {
        Self {
            windows: windows
                .iter()
                .map(|w| (w.start.timestamp(), w.end.timestamp()))
                .collect(),
            cues_per_window,
            spacing_secs,
        }
    }

    /// Rebuild windows on the receiving side
    ///
    /// Pairs that do not form a valid forward range are dropped rather than
    /// surfaced as errors.
    pub fn to_windows(&self) -> Vec<TimeWindow> {
        self.windows
            .iter()
            .filter_map(|&(start, end)| {
                let start = DateTime::<Utc>::from_timestamp(start, 0)?;
                let end = DateTime::<Utc>::from_timestamp(end, 0)?;
                (start < end).then_some(TimeWindow::new(start, end))
            })
            .collect()
    }

    /// Serialize to the JSON wire form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse from the JSON wire form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn window(offset_mins: i64) -> TimeWindow {
        let start = Utc.with_ymd_and_hms(2026, 2, 2, 2, 0, 0).unwrap()
            + Duration::minutes(offset_mins);
        TimeWindow::new(start, start + Duration::minutes(90))
    }

    #[test]
    fn test_payload_round_trip() {
        let windows = vec![window(0), window(180)];
        let payload = WindowSyncPayload::from_windows(&windows, 5, 120);
        let json = payload.to_json().unwrap();
        let decoded = WindowSyncPayload::from_json(&json).unwrap();
        assert_eq!(decoded, payload);
        assert_eq!(decoded.to_windows(), windows);
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let payload = WindowSyncPayload::from_windows(&[window(0)], 5, 120);
        let json = payload.to_json().unwrap();
        assert!(json.contains("\"cuesPerWindow\":5"));
        assert!(json.contains("\"spacingSecs\":120"));
    }

    #[test]
    fn test_degenerate_pairs_dropped_on_decode() {
        let payload = WindowSyncPayload {
            windows: vec![(100, 100), (200, 150), (300, 400)],
            cues_per_window: 5,
            spacing_secs: 120,
        };
        let windows = payload.to_windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start.timestamp(), 300);
    }
}
