//! Extract module - From raw stage intervals to per-night histograms
//!
//! Real sensor data arrives fragmented by brief wake periods and polluted by
//! naps. This module reconstructs one believable main sleep episode per
//! calendar day and converts its REM segments into a fixed-size histogram of
//! REM seconds over time-since-onset bins.

mod episode;
mod histogram;

pub use episode::{extract_main_episode, EpisodeConfig};
pub use histogram::{build_night, nights_from_samples, NightConfig, MIN_NIGHT_SECS};
