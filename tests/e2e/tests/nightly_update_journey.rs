//! Complete nightly-update journey against a real database file
//!
//! Samples in, persisted nights and snapshot out, windows anchored to the
//! predicted bedtime, cues and companion payload ready for the external
//! schedulers.

use chrono::{Duration, TimeZone, Utc};
use remcast_core::{should_run_now, Store, UpdateEngine, WindowSyncPayload};
use remcast_e2e_tests::fixtures;
use tempfile::TempDir;

#[test]
fn nightly_update_end_to_end() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("remcast.db");
    let store = Store::new(Some(db_path.clone())).unwrap();
    let engine = UpdateEngine::new();
    let now = fixtures::reference_now();

    let mut samples = Vec::new();
    for d in 0..14 {
        samples.extend(fixtures::fragmented_night(d, &[300]));
        samples.push(fixtures::afternoon_nap(d));
    }

    let outcome = engine.run_nightly_update(&samples, &store, now).unwrap();

    // 14 nights persisted, one snapshot row
    assert_eq!(store.night_count().unwrap(), 14);
    let snapshot = store.curve_snapshot().unwrap().unwrap();
    assert_eq!(snapshot.prob_bins, outcome.curve);

    // Curve is a probability distribution concentrated around bin 10
    let total: f64 = outcome.curve.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
    let peak_mass: f64 = outcome.curve[9..=11].iter().sum();
    assert!(peak_mass > 0.9);

    // Median onset is 00:30; that time has passed today, so the anchor is
    // tomorrow night
    assert_eq!(
        outcome.expected_sleep_start,
        Utc.with_ymd_and_hms(2026, 2, 2, 0, 30, 0).unwrap()
    );

    // Windows are future, ordered, and within the curve's 10-hour span
    assert!(!outcome.windows.is_empty());
    for window in &outcome.windows {
        assert!(window.start > now);
        assert!(window.end <= outcome.expected_sleep_start + Duration::minutes(20 * 30));
    }

    // Every cue lands inside its window, in the future
    assert!(!outcome.cues.is_empty());
    for cue in &outcome.cues {
        assert!(outcome.windows[cue.window_index].contains(cue.fire_at));
        assert!(cue.fire_at > now + Duration::seconds(5));
    }

    // Companion payload survives the JSON wire format
    let json = outcome.payload.to_json().unwrap();
    let decoded = WindowSyncPayload::from_json(&json).unwrap();
    assert_eq!(decoded.to_windows(), outcome.windows);

    // The wire shape itself is camelCase keys over epoch-second pairs
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["cuesPerWindow"], 5);
    assert_eq!(value["spacingSecs"], 120);
    let pairs = value["windows"].as_array().unwrap();
    assert_eq!(pairs.len(), outcome.windows.len());
    assert_eq!(
        pairs[0][0].as_i64(),
        Some(outcome.windows[0].start.timestamp())
    );
}

#[test]
fn reimport_and_reopen_converge() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("remcast.db");
    let engine = UpdateEngine::new();
    let now = fixtures::reference_now();

    let mut samples = Vec::new();
    for d in 0..5 {
        samples.extend(fixtures::fragmented_night(d, &[300]));
    }

    {
        let store = Store::new(Some(db_path.clone())).unwrap();
        engine.run_nightly_update(&samples, &store, now).unwrap();
        engine.run_nightly_update(&samples, &store, now).unwrap();
        assert_eq!(store.night_count().unwrap(), 5);
    }

    // Reopen: history and snapshot survive, nights stay deduplicated
    let reopened = Store::new(Some(db_path)).unwrap();
    assert_eq!(reopened.night_count().unwrap(), 5);
    assert!(reopened.curve_snapshot().unwrap().is_some());

    let outcome = engine.run_nightly_update(&samples, &reopened, now).unwrap();
    assert_eq!(reopened.night_count().unwrap(), 5);
    assert!(!outcome.windows.is_empty());
}

#[test]
fn update_gate_uses_snapshot_timestamp() {
    let store = Store::open_in_memory().unwrap();
    let engine = UpdateEngine::new();
    let offset = engine.config().episode.local_offset;

    // Fresh install: due as soon as the deadline passes
    let morning = Utc.with_ymd_and_hms(2026, 2, 1, 10, 30, 0).unwrap();
    assert!(should_run_now(
        store.last_updated_at().unwrap(),
        morning,
        offset
    ));

    engine
        .run_nightly_update(&fixtures::fragmented_night(0, &[300]), &store, morning)
        .unwrap();

    // Snapshot written moments ago: today's update is done
    let later = morning + Duration::hours(3);
    assert!(!should_run_now(
        store.last_updated_at().unwrap(),
        later,
        offset
    ));
}

#[test]
fn empty_provider_data_still_produces_a_schedule() {
    let store = Store::open_in_memory().unwrap();
    let engine = UpdateEngine::new();
    let now = fixtures::reference_now();

    let outcome = engine.run_nightly_update(&[], &store, now).unwrap();

    assert_eq!(store.night_count().unwrap(), 0);
    for v in &outcome.curve {
        assert!((v - 1.0 / 20.0).abs() < 1e-12);
    }
    // Flat curve, no history: windows anchored at `now` itself
    assert_eq!(outcome.expected_sleep_start, now);
    assert_eq!(outcome.windows.len(), 2);
    assert!(outcome.payload.to_windows().len() == 2);
}
