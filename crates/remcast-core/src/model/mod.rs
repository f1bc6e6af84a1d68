//! Model module - Core types and data structures
//!
//! Value types flowing through the forecasting pipeline:
//! - Raw stage intervals as delivered by a sample provider
//! - Merged sleep episodes and per-night REM histograms
//! - Curve snapshots, target windows, and planned cues
//!
//! Every stage of the pipeline consumes its inputs by reference and produces
//! new owned outputs; nothing here is mutated after it crosses a boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// SLEEP STAGES
// ============================================================================

/// Sleep stage classification of a raw interval
///
/// Mirrors the staged-sleep vocabulary of wearable sample providers: a
/// generic asleep value plus core/deep/REM refinements, and an in-bed value
/// that carries no sleep information.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    /// Generic asleep (providers without stage resolution)
    #[default]
    Asleep,
    /// Core (light) sleep
    AsleepCore,
    /// Deep (slow-wave) sleep
    AsleepDeep,
    /// REM sleep
    AsleepRem,
    /// In bed but not necessarily asleep
    InBed,
}

impl SleepStage {
    /// True for every asleep variant, false for `InBed`
    pub fn is_asleep(&self) -> bool {
        !matches!(self, SleepStage::InBed)
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepStage::Asleep => "asleep",
            SleepStage::AsleepCore => "asleep_core",
            SleepStage::AsleepDeep => "asleep_deep",
            SleepStage::AsleepRem => "asleep_rem",
            SleepStage::InBed => "in_bed",
        }
    }
}

impl std::fmt::Display for SleepStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SleepStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asleep" => Ok(SleepStage::Asleep),
            "asleep_core" | "core" => Ok(SleepStage::AsleepCore),
            "asleep_deep" | "deep" => Ok(SleepStage::AsleepDeep),
            "asleep_rem" | "rem" => Ok(SleepStage::AsleepRem),
            "in_bed" | "inbed" => Ok(SleepStage::InBed),
            _ => Err(format!("Unknown sleep stage: {}", s)),
        }
    }
}

// ============================================================================
// STAGE INTERVALS
// ============================================================================

/// One raw sleep-stage observation
///
/// Unowned input from the sample provider. Zero or negative duration
/// intervals are dropped upstream; the pipeline assumes `end > start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageInterval {
    /// Observation start
    pub start: DateTime<Utc>,
    /// Observation end
    pub end: DateTime<Utc>,
    /// Stage classification
    pub stage: SleepStage,
}

impl StageInterval {
    /// Create a new interval
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, stage: SleepStage) -> Self {
        Self { start, end, stage }
    }

    /// Interval duration in whole seconds
    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

// ============================================================================
// SLEEP EPISODES
// ============================================================================

/// A merged run of asleep intervals - one candidate main sleep period
///
/// Built by the episode extractor; spans the min start / max end of its
/// constituent segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepEpisode {
    /// Episode start (earliest segment start)
    pub start: DateTime<Utc>,
    /// Episode end (latest segment end)
    pub end: DateTime<Utc>,
    /// Constituent raw segments, in start order
    pub segments: Vec<StageInterval>,
}

impl SleepEpisode {
    /// Episode duration in whole seconds
    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

// ============================================================================
// SLEEP NIGHTS
// ============================================================================

/// One retained night: the per-bin REM histogram for a main sleep episode
///
/// Immutable once built; the unit persisted to storage and consumed by the
/// curve builder. Bins measure REM seconds at fixed offsets since sleep
/// onset. Invariant: `sum(rem_bin_seconds) <= rem_seconds <= duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepNight {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Sleep onset
    pub sleep_start: DateTime<Utc>,
    /// Final wake
    pub sleep_end: DateTime<Utc>,
    /// Total REM seconds across the night
    pub rem_seconds: f64,
    /// REM seconds per time-since-onset bin, fixed length = bin count
    pub rem_bin_seconds: Vec<f64>,
}

impl SleepNight {
    /// Create a new night with a fresh id
    pub fn new(
        sleep_start: DateTime<Utc>,
        sleep_end: DateTime<Utc>,
        rem_seconds: f64,
        rem_bin_seconds: Vec<f64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sleep_start,
            sleep_end,
            rem_seconds,
            rem_bin_seconds,
        }
    }

    /// Night duration in whole seconds
    pub fn duration_secs(&self) -> i64 {
        (self.sleep_end - self.sleep_start).num_seconds()
    }
}

// ============================================================================
// CURVE SNAPSHOTS
// ============================================================================

/// Persisted model state: the latest probability curve and its parameters
///
/// A single upsertable record; recomputed fresh on every update run, never
/// incrementally patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveSnapshot {
    /// When the snapshot was written
    pub updated_at: DateTime<Utc>,
    /// Probability mass per bin, sums to 1
    pub prob_bins: Vec<f64>,
    /// Recency half-life used to produce the curve
    pub half_life_days: f64,
    /// Smoothing radius used to produce the curve
    pub smoothing_radius_bins: usize,
}

// ============================================================================
// TIME WINDOWS
// ============================================================================

/// A contiguous absolute time range expected to contain REM sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    /// Window start (inclusive)
    pub start: DateTime<Utc>,
    /// Window end (exclusive for cue placement)
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a new window; callers guarantee `start < end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window length in whole seconds
    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// Whether an instant falls inside `[start, end)`
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

// ============================================================================
// PLANNED CUES
// ============================================================================

/// One scheduled cue instant inside a target window
///
/// The identifier is derived deterministically from the window index, cue
/// index, and epoch seconds so an external notifier can implement idempotent
/// replace-all-pending semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedCue {
    /// Deterministic identifier (`remcue.<window>.<cue>.<epoch>`)
    pub id: String,
    /// Index of the originating window
    pub window_index: usize,
    /// Index of the cue within its window
    pub cue_index: usize,
    /// When the cue fires
    pub fire_at: DateTime<Utc>,
}

// ============================================================================
// TESTS
// ============================================================================
