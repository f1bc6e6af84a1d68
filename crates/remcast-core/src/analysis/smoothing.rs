//! Bounded moving-average smoothing
//!
//! Compensates for bin-alignment noise between nights whose true REM timing
//! differs slightly. The window is clamped at the sequence boundaries, not
//! wrapped, so edge bins average over fewer neighbors.

/// Moving average with a clamped window of `radius` bins on each side
///
/// Returns a sequence of the same length as the input. A radius of zero or
/// an empty input returns the input unchanged.
pub fn moving_average(values: &[f64], radius: usize) -> Vec<f64> {
    if radius == 0 || values.is_empty() {
        return values.to_vec();
    }

    let n = values.len();
    let mut out = vec![0.0; n];

    for (i, slot) in out.iter_mut().enumerate() {
        let lo = i.saturating_sub(radius);
        let hi = (i + radius).min(n - 1);
        let window = &values[lo..=hi];
        let sum: f64 = window.iter().sum();
        *slot = sum / window.len() as f64;
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
