//! Probability curve construction
//!
//! Aggregates many nights' REM histograms into a single probability
//! distribution over time-since-onset bins. Recent nights dominate through
//! exponential recency decay; older nights contribute a fading signal.

use chrono::{DateTime, Utc};

use crate::model::SleepNight;

use super::smoothing::moving_average;

const SECS_PER_DAY: f64 = 86_400.0;

/// Floor on the half-life to keep the decay exponent finite
const MIN_HALF_LIFE_DAYS: f64 = 0.1;

/// Parameters for probability curve construction
#[derive(Debug, Clone, PartialEq)]
pub struct CurveParams {
    /// Number of time-since-onset bins
    pub bin_count: usize,
    /// Recency half-life: a night this many days old carries weight 0.5
    pub half_life_days: f64,
    /// Moving-average radius applied before normalization
    pub smoothing_radius_bins: usize,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            bin_count: crate::DEFAULT_BIN_COUNT,
            half_life_days: 14.0,
            smoothing_radius_bins: 1,
        }
    }
}

/// Uniform fallback distribution: `1/bin_count` per bin
///
/// The defined cold-start result for an empty night set, and the fallback
/// when smoothed totals are degenerate.
pub fn uniform_curve(bin_count: usize) -> Vec<f64> {
    if bin_count == 0 {
        return Vec::new();
    }
    vec![1.0 / bin_count as f64; bin_count]
}

/// Build the REM probability curve from retained nights
///
/// Each night's histogram is weighted by `0.5^(days_ago / half_life_days)`
/// relative to `now`, accumulated per bin, smoothed, and normalized into a
/// probability mass function. Nights whose histograms are shorter than
/// `bin_count` contribute only their available bins.
pub fn probability_curve(
    nights: &[SleepNight],
    params: &CurveParams,
    now: DateTime<Utc>,
) -> Vec<f64> {
    let bin_count = params.bin_count;
    if nights.is_empty() {
        return uniform_curve(bin_count);
    }

    let mut score = vec![0.0; bin_count];
    let half_life = params.half_life_days.max(MIN_HALF_LIFE_DAYS);

    for night in nights {
        let days_ago = (now - night.sleep_start).num_seconds().abs() as f64 / SECS_PER_DAY;
        let w = 0.5_f64.powf(days_ago / half_life);

        // Tolerate histograms recorded with a different bin count
        let bins = &night.rem_bin_seconds;
        for i in 0..bin_count.min(bins.len()) {
            score[i] += w * bins[i];
        }
    }

    let smoothed = moving_average(&score, params.smoothing_radius_bins);

    let total: f64 = smoothed.iter().sum();
    if total <= 0.0 {
        tracing::warn!(
            nights = nights.len(),
            "no REM mass in retained nights, falling back to uniform curve"
        );
        return uniform_curve(bin_count);
    }

    smoothed.iter().map(|v| v / total).collect()
}

// ============================================================================
// TESTS
// ============================================================================
