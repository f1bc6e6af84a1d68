//! Analysis module - Probability curve construction and window selection
//!
//! The statistical half of the pipeline:
//! - Bounded moving-average smoothing
//! - Recency-weighted aggregation of night histograms into a probability curve
//! - Peak finding with non-max suppression into absolute target windows

mod curve;
mod smoothing;
mod windows;

pub use curve::{probability_curve, uniform_curve, CurveParams};
pub use smoothing::moving_average;
pub use windows::{
    select_top_windows, IGNORE_PREFIX_BINS, MIN_SEPARATION_BINS, WINDOW_RADIUS_BINS,
};
