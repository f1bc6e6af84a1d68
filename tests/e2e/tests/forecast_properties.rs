//! End-to-end properties of the pure forecasting pipeline
//!
//! Exercises the sample → night → curve → window chain without storage.

use chrono::{Duration, TimeZone, Utc};
use remcast_core::{
    nights_from_samples, plan_cues, probability_curve, select_top_windows, CurveParams,
    NightConfig,
};
use remcast_e2e_tests::fixtures;

#[test]
fn fourteen_identical_nights_peak_at_their_rem_bin() {
    // 14 nights, 1200 REM seconds in bin 10 and nothing else, no smoothing:
    // the curve maximum must sit exactly on bin 10.
    let nights: Vec<_> = (0..14)
        .map(|d| fixtures::night_with_rem_in_bin(d, 10, 1200.0))
        .collect();
    let params = CurveParams {
        bin_count: 20,
        half_life_days: 14.0,
        smoothing_radius_bins: 0,
    };
    let curve = probability_curve(&nights, &params, fixtures::reference_now());

    let max_bin = curve
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(max_bin, 10);

    let anchor = Utc.with_ymd_and_hms(2026, 2, 1, 23, 0, 0).unwrap();
    let windows = select_top_windows(&curve, anchor, 30, 1);
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start, anchor + Duration::minutes(9 * 30));
    assert_eq!(windows[0].end, anchor + Duration::minutes(12 * 30));
}

#[test]
fn empty_history_yields_uniform_curve_and_stable_windows() {
    let curve = probability_curve(&[], &CurveParams::default(), fixtures::reference_now());
    assert_eq!(curve.len(), 20);
    for v in &curve {
        assert!((v - 1.0 / 20.0).abs() < 1e-12);
    }

    // A flat curve has plateau maxima everywhere past the ignored prefix;
    // selection must still be deterministic: bins 2 and 5.
    let anchor = Utc.with_ymd_and_hms(2026, 2, 1, 23, 0, 0).unwrap();
    let windows = select_top_windows(&curve, anchor, 30, 2);
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].start, anchor + Duration::minutes(30));
    assert_eq!(windows[1].start, anchor + Duration::minutes(4 * 30));

    let rerun = select_top_windows(&curve, anchor, 30, 2);
    assert_eq!(rerun, windows);
}

#[test]
fn fragmented_samples_flow_through_to_cues() {
    // Three fragmented nights with REM at minutes 300 and 420 (bins 10/14),
    // plus naps that must not displace the main episodes.
    let mut samples = Vec::new();
    for d in 0..3 {
        samples.extend(fixtures::fragmented_night(d, &[300, 420]));
        samples.push(fixtures::afternoon_nap(d));
    }

    let nights = nights_from_samples(&samples, &NightConfig::default());
    assert_eq!(nights.len(), 3);
    for night in &nights {
        assert_eq!(night.duration_secs(), 8 * 3600);
        assert!((night.rem_seconds - 2400.0).abs() < 1e-6);
        assert!((night.rem_bin_seconds[10] - 1200.0).abs() < 1e-6);
        assert!((night.rem_bin_seconds[14] - 1200.0).abs() < 1e-6);
    }

    let now = fixtures::reference_now();
    let curve = probability_curve(&nights, &CurveParams::default(), now);
    let total: f64 = curve.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);

    let anchor = Utc.with_ymd_and_hms(2026, 2, 1, 23, 0, 0).unwrap();
    let windows = select_top_windows(&curve, anchor, 30, 2);
    assert_eq!(windows.len(), 2);
    assert!(windows[0].start < windows[1].start);

    let cues = plan_cues(&windows, 5, 120, now);
    assert_eq!(cues.len(), 10);
    for cue in &cues {
        let window = &windows[cue.window_index];
        assert!(window.contains(cue.fire_at));
        assert!(cue.fire_at > now + Duration::seconds(5));
    }
}

#[test]
fn separation_rule_limits_crowded_peaks() {
    // Two strong bins within three bins of each other: only the stronger
    // survives, so fewer than max_windows come back.
    let nights = vec![
        fixtures::night_with_rem_in_bin(0, 8, 1800.0),
        fixtures::night_with_rem_in_bin(1, 9, 900.0),
    ];
    let params = CurveParams {
        smoothing_radius_bins: 0,
        ..Default::default()
    };
    let curve = probability_curve(&nights, &params, fixtures::reference_now());

    let anchor = Utc.with_ymd_and_hms(2026, 2, 1, 23, 0, 0).unwrap();
    let windows = select_top_windows(&curve, anchor, 30, 2);
    // Peaks at bins 8 and 9 collapse to one window plus a zero-plateau pick
    assert!(windows.len() <= 2);
    assert!(windows
        .iter()
        .any(|w| w.start == anchor + Duration::minutes(7 * 30)));
}
