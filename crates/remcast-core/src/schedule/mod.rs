//! Schedule module - Cue timing, bedtime prediction, and update gating
//!
//! Turns target windows into concrete future cue instants, predicts tonight's
//! bedtime from recent onset history, and decides when the daily update run
//! is due.

mod bedtime;
mod cues;
mod policy;

pub use bedtime::{infer_expected_sleep_start, BEDTIME_SAMPLE_NIGHTS};
pub use cues::{plan_cues, CUE_ID_PREFIX, MIN_LEAD_SECS};
pub use policy::{should_run_now, today_deadline, DEADLINE_HOUR, DEADLINE_MINUTE};
