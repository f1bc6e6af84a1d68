//! Per-night REM histogram construction
//!
//! Converts a main sleep episode's REM segments into fixed-size bins of REM
//! seconds since sleep onset. Overlap is computed exactly: a segment
//! crossing a bin boundary contributes proportionally to both bins, not to
//! the nearest one.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{SleepEpisode, SleepNight, SleepStage, StageInterval};

use super::episode::{extract_main_episode, EpisodeConfig};

/// Episodes shorter than this are not meaningful main-sleep nights
pub const MIN_NIGHT_SECS: i64 = 2 * 60 * 60;

/// Guards the last-bin computation against exact bin-boundary endpoints
const BIN_EPSILON: f64 = 1e-4;

/// Configuration for night histogram construction
#[derive(Debug, Clone)]
pub struct NightConfig {
    /// Number of time-since-onset bins
    pub bin_count: usize,
    /// Bin width in minutes
    pub bin_minutes: i64,
    /// Episode extraction settings
    pub episode: EpisodeConfig,
}

impl Default for NightConfig {
    fn default() -> Self {
        Self {
            bin_count: crate::DEFAULT_BIN_COUNT,
            bin_minutes: 30,
            episode: EpisodeConfig::default(),
        }
    }
}

/// Build one night's histogram from a main sleep episode
///
/// Returns `None` for episodes shorter than two hours or with a degenerate
/// span. REM segments are clipped to the episode bounds before binning;
/// time past the last bin still counts toward `rem_seconds`.
pub fn build_night(episode: &SleepEpisode, bin_count: usize, bin_secs: f64) -> Option<SleepNight> {
    if episode.end <= episode.start || bin_count == 0 || bin_secs <= 0.0 {
        return None;
    }
    if episode.duration_secs() < MIN_NIGHT_SECS {
        return None;
    }

    let mut bins = vec![0.0; bin_count];
    let mut rem_total = 0.0;

    for segment in &episode.segments {
        if segment.stage != SleepStage::AsleepRem {
            continue;
        }

        let clipped_start = segment.start.max(episode.start);
        let clipped_end = segment.end.min(episode.end);
        let duration = (clipped_end - clipped_start).num_milliseconds() as f64 / 1000.0;
        if duration <= 0.0 {
            continue;
        }

        rem_total += duration;

        let offset_start = (clipped_start - episode.start).num_milliseconds() as f64 / 1000.0;
        let offset_end = (clipped_end - episode.start).num_milliseconds() as f64 / 1000.0;

        let first_bin = ((offset_start / bin_secs).floor().max(0.0)) as usize;
        let last_bin = (((offset_end - BIN_EPSILON) / bin_secs).floor().max(0.0) as usize)
            .min(bin_count - 1);

        for (b, slot) in bins
            .iter_mut()
            .enumerate()
            .take(last_bin + 1)
            .skip(first_bin)
        {
            let bin_start = b as f64 * bin_secs;
            let bin_end = (b + 1) as f64 * bin_secs;
            let overlap = (offset_end.min(bin_end) - offset_start.max(bin_start)).max(0.0);
            *slot += overlap;
        }
    }

    Some(SleepNight::new(
        episode.start,
        episode.end,
        rem_total,
        bins,
    ))
}

/// Map raw stage intervals to retained nights
///
/// Groups intervals by the local calendar day of their start, extracts the
/// main episode per day, and builds one histogram per qualifying night.
/// Days without asleep data or with sub-two-hour episodes are silently
/// excluded. Result is sorted by sleep start ascending.
pub fn nights_from_samples(samples: &[StageInterval], config: &NightConfig) -> Vec<SleepNight> {
    let mut by_day: BTreeMap<NaiveDate, Vec<StageInterval>> = BTreeMap::new();
    for sample in samples {
        let day = sample
            .start
            .with_timezone(&config.episode.local_offset)
            .date_naive();
        by_day.entry(day).or_default().push(sample.clone());
    }

    let bin_secs = (config.bin_minutes * 60) as f64;
    let mut nights: Vec<SleepNight> = by_day
        .values()
        .filter_map(|group| extract_main_episode(group, &config.episode))
        .filter_map(|episode| build_night(&episode, config.bin_count, bin_secs))
        .collect();

    nights.sort_by_key(|n| n.sleep_start);
    tracing::debug!(
        days = by_day.len(),
        nights = nights.len(),
        "mapped stage intervals to nights"
    );
    nights
}

// ============================================================================
// TESTS
// ============================================================================
