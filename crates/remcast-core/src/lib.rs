//! # Remcast Core
//!
//! REM-window forecasting engine. Predicts the clock-time windows most
//! likely to contain REM sleep on an upcoming night from recent sleep-stage
//! history, and emits a small schedule of cue timestamps inside them.
//!
//! The pipeline, leaf-first:
//!
//! - **Smoothing**: clamped moving average over curve bins
//! - **Episode extraction**: fragmented asleep intervals → one main sleep
//!   episode per day, naps suppressed
//! - **Night histograms**: exact per-bin REM-seconds accumulation since
//!   sleep onset
//! - **Probability curve**: exponential recency weighting across nights,
//!   smoothed and normalized
//! - **Window selection**: local maxima with non-max suppression, anchored
//!   to a predicted bedtime
//! - **Cue timing**: evenly spaced future instants inside each window
//!
//! The whole pipeline is pure, synchronous, and total: sparse or malformed
//! input degrades to documented fallback values instead of errors. The
//! storage layer persists retained nights and the latest curve snapshot in
//! SQLite.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use remcast_core::{Store, UpdateEngine};
//!
//! let store = Store::new(None)?;
//! let engine = UpdateEngine::new();
//!
//! // samples: already-retrieved stage intervals from the provider
//! let outcome = engine.run_nightly_update(&samples, &store, chrono::Utc::now())?;
//!
//! // hand outcome.cues to the notification scheduler,
//! // outcome.payload to the companion-device transport
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod analysis;
pub mod engine;
pub mod extract;
pub mod model;
pub mod schedule;
pub mod storage;
pub mod sync;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Model types
pub use model::{
    CurveSnapshot, PlannedCue, SleepEpisode, SleepNight, SleepStage, StageInterval, TimeWindow,
};

// Analysis pipeline
pub use analysis::{
    moving_average, probability_curve, select_top_windows, uniform_curve, CurveParams,
    IGNORE_PREFIX_BINS, MIN_SEPARATION_BINS, WINDOW_RADIUS_BINS,
};

// Extraction
pub use extract::{
    build_night, extract_main_episode, nights_from_samples, EpisodeConfig, NightConfig,
    MIN_NIGHT_SECS,
};

// Scheduling
pub use schedule::{
    infer_expected_sleep_start, plan_cues, should_run_now, today_deadline,
    BEDTIME_SAMPLE_NIGHTS, CUE_ID_PREFIX, DEADLINE_HOUR, DEADLINE_MINUTE, MIN_LEAD_SECS,
};

// Storage layer
pub use storage::{Result, Store, StoreError};

// Companion sync
pub use sync::WindowSyncPayload;

// Update engine
pub use engine::{EngineConfig, UpdateEngine, UpdateOutcome};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of curve bins (10 hours at 30-minute bins)
pub const DEFAULT_BIN_COUNT: usize = 20;

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        CurveParams, CurveSnapshot, EngineConfig, EpisodeConfig, NightConfig, PlannedCue, Result,
        SleepNight, SleepStage, StageInterval, Store, StoreError, TimeWindow, UpdateEngine,
        UpdateOutcome, WindowSyncPayload,
    };
}
