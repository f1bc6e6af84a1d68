//! Main sleep episode extraction
//!
//! Merges fragmented asleep intervals into candidate episodes, discards
//! naps, and picks the most night-like candidate.

use chrono::{FixedOffset, Timelike};

use crate::model::{SleepEpisode, StageInterval};

/// Score bonus for an episode that starts inside the night window
const NIGHT_START_BONUS: f64 = 1.5;

/// Configuration for episode extraction
#[derive(Debug, Clone)]
pub struct EpisodeConfig {
    /// Gaps up to this many seconds are merged into one episode
    pub merge_gap_secs: i64,
    /// Episodes shorter than this are treated as naps
    pub min_main_sleep_secs: i64,
    /// Local hour at which the night window opens
    pub night_start_hour: u32,
    /// Local hour at which the night window closes (next day when wrapping)
    pub night_end_hour: u32,
    /// Offset applied for local hour-of-day and calendar-day decisions
    pub local_offset: FixedOffset,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            merge_gap_secs: 20 * 60,
            min_main_sleep_secs: 90 * 60,
            night_start_hour: 18,
            night_end_hour: 12,
            local_offset: utc_offset(),
        }
    }
}

/// The zero offset; `east_opt(0)` is always in range
pub(crate) fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset is valid")
}

/// Extract the main sleep episode from one day's stage intervals
///
/// Returns `None` only when the input contains no asleep data at all. When
/// every candidate is nap-length, the longest one is returned rather than
/// discarding the day.
pub fn extract_main_episode(
    samples: &[StageInterval],
    config: &EpisodeConfig,
) -> Option<SleepEpisode> {
    let mut asleep: Vec<&StageInterval> = samples.iter().filter(|s| s.stage.is_asleep()).collect();
    asleep.sort_by_key(|s| s.start);

    let first = asleep.first()?;

    // Greedy merge of close segments into episodes
    let mut episodes: Vec<SleepEpisode> = Vec::new();
    let mut current = SleepEpisode {
        start: first.start,
        end: first.end,
        segments: vec![(*first).clone()],
    };

    for s in &asleep[1..] {
        let gap = (s.start - current.end).num_seconds();
        if gap <= config.merge_gap_secs {
            current.segments.push((*s).clone());
            current.end = current.end.max(s.end);
        } else {
            episodes.push(current);
            current = SleepEpisode {
                start: s.start,
                end: s.end,
                segments: vec![(*s).clone()],
            };
        }
    }
    episodes.push(current);

    // Drop nap-length episodes; fall back to the longest if nothing survives
    let candidates: Vec<&SleepEpisode> = episodes
        .iter()
        .filter(|e| e.duration_secs() >= config.min_main_sleep_secs)
        .collect();

    if candidates.is_empty() {
        return episodes
            .iter()
            .max_by_key(|e| e.duration_secs())
            .cloned();
    }

    candidates
        .into_iter()
        .max_by(|a, b| {
            score(a, config)
                .partial_cmp(&score(b, config))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .cloned()
}

/// Duration in hours plus a bonus for starting inside the night window
fn score(episode: &SleepEpisode, config: &EpisodeConfig) -> f64 {
    let dur_hours = episode.duration_secs() as f64 / 3600.0;
    let bonus = if starts_in_night_window(episode, config) {
        NIGHT_START_BONUS
    } else {
        0.0
    };
    dur_hours + bonus
}

fn starts_in_night_window(episode: &SleepEpisode, config: &EpisodeConfig) -> bool {
    let hour = episode.start.with_timezone(&config.local_offset).hour();
    let (start, end) = (config.night_start_hour, config.night_end_hour);

    if start > end {
        // Wrapping overnight window, e.g. 18 -> 12 means [18..23] U [0..12]
        hour >= start || hour <= end
    } else {
        hour >= start && hour <= end
    }
}

// ============================================================================
// TESTS
// ============================================================================
