//! Engine module - The nightly update run
//!
//! Composes the whole pipeline over a consistent snapshot of inputs: raw
//! stage intervals in, persisted nights and curve out, plus the windows,
//! cue plan, and companion payload for the external schedulers. The caller
//! serializes runs (one per logical day, see [`crate::schedule::should_run_now`]);
//! the engine itself is a plain synchronous computation.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{probability_curve, select_top_windows, CurveParams};
use crate::extract::{nights_from_samples, EpisodeConfig, NightConfig};
use crate::model::{PlannedCue, StageInterval, TimeWindow};
use crate::schedule::{infer_expected_sleep_start, plan_cues};
use crate::storage::{Result, Store};
use crate::sync::WindowSyncPayload;

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Tunable parameters for an update run, with the stock defaults
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of time-since-onset bins
    pub bin_count: usize,
    /// Bin width in minutes
    pub bin_minutes: i64,
    /// Recency half-life in days
    pub half_life_days: f64,
    /// Curve smoothing radius in bins
    pub smoothing_radius_bins: usize,
    /// Maximum target windows per night
    pub max_windows: usize,
    /// Cues placed in each window
    pub cues_per_window: i32,
    /// Spacing between cues in seconds
    pub spacing_secs: i64,
    /// Bound on the stored-nights query
    pub recent_nights_limit: usize,
    /// Episode extraction settings (merge gap, nap floor, night window)
    pub episode: EpisodeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bin_count: crate::DEFAULT_BIN_COUNT,
            bin_minutes: 30,
            half_life_days: 14.0,
            smoothing_radius_bins: 1,
            max_windows: 2,
            cues_per_window: 5,
            spacing_secs: 120,
            recent_nights_limit: 60,
            episode: EpisodeConfig::default(),
        }
    }
}

impl EngineConfig {
    fn curve_params(&self) -> CurveParams {
        CurveParams {
            bin_count: self.bin_count,
            half_life_days: self.half_life_days,
            smoothing_radius_bins: self.smoothing_radius_bins,
        }
    }

    fn night_config(&self) -> NightConfig {
        NightConfig {
            bin_count: self.bin_count,
            bin_minutes: self.bin_minutes,
            episode: self.episode.clone(),
        }
    }

    fn local_offset(&self) -> FixedOffset {
        self.episode.local_offset
    }
}

// ============================================================================
// UPDATE OUTCOME
// ============================================================================

/// Everything one update run produces for the surrounding application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    /// The freshly computed probability curve
    pub curve: Vec<f64>,
    /// Predicted bedtime the windows are anchored to
    pub expected_sleep_start: DateTime<Utc>,
    /// Target windows, sorted by start
    pub windows: Vec<TimeWindow>,
    /// Cue plan for the local notification scheduler
    pub cues: Vec<PlannedCue>,
    /// Payload for the companion-device transport
    pub payload: WindowSyncPayload,
    /// When the run completed
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// UPDATE ENGINE
// ============================================================================

/// Runs the nightly update over already-retrieved samples and a store
pub struct UpdateEngine {
    config: EngineConfig,
}

impl Default for UpdateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateEngine {
    /// Create an engine with stock parameters
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Create with custom parameters
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one nightly update
    ///
    /// Maps samples to nights, persists them with overlap replacement,
    /// recomputes the curve over the stored history, persists the snapshot,
    /// and derives windows, cues, and the companion payload. Sparse or
    /// malformed sample data degrades to fallback values; only storage
    /// failures surface as errors.
    pub fn run_nightly_update(
        &self,
        samples: &[StageInterval],
        store: &Store,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome> {
        let config = &self.config;

        let fresh_nights = nights_from_samples(samples, &config.night_config());
        store.replace_overlapping_nights(&fresh_nights)?;

        let stored = store.recent_nights(config.recent_nights_limit)?;
        tracing::info!(
            fresh = fresh_nights.len(),
            stored = stored.len(),
            "running nightly update"
        );

        let curve = probability_curve(&stored, &config.curve_params(), now);
        let snapshot = store.upsert_curve_snapshot(
            &curve,
            config.half_life_days,
            config.smoothing_radius_bins,
            now,
        )?;

        let expected_sleep_start =
            infer_expected_sleep_start(&stored, now, config.local_offset());
        let windows = select_top_windows(
            &curve,
            expected_sleep_start,
            config.bin_minutes,
            config.max_windows,
        );
        let cues = plan_cues(&windows, config.cues_per_window, config.spacing_secs, now);
        let payload =
            WindowSyncPayload::from_windows(&windows, config.cues_per_window, config.spacing_secs);

        tracing::debug!(
            windows = windows.len(),
            cues = cues.len(),
            ?expected_sleep_start,
            "nightly update complete"
        );

        Ok(UpdateOutcome {
            curve,
            expected_sleep_start,
            windows,
            cues,
            payload,
            updated_at: snapshot.updated_at,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
