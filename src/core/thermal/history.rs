//! Pure, stateless functions over the recorded sample sequence.
//!
//! Display decimation, temperature axis ranging, time-in-state accounting
//! and point lookup all operate on a slice of samples plus an explicit
//! "now", so they are trivially testable with synthetic histories.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::types::{PressureLevel, Sample};

/// Default cap for display downsampling.
pub const DEFAULT_DISPLAY_CAP: usize = 300;

/// Default temperature axis when no readings exist.
pub const DEFAULT_TEMP_RANGE: (f32, f32) = (30.0, 100.0);

/// Margin added on each side of the observed min/max, in degrees.
const RANGE_MARGIN: f32 = 5.0;

/// Absolute plausible axis bounds for CPU temperature display.
const RANGE_FLOOR: f32 = 30.0;
const RANGE_CEIL: f32 = 110.0;

/// Stride-sample `samples` down to at most `cap` entries for display.
///
/// Selects indices `i * len / cap`; the last selected entry is force-replaced
/// with the true last sample so the most recent state is always shown.
/// Returned entries are exact recorded samples, never synthesized averages.
pub fn downsample(samples: &[Sample], cap: usize) -> Vec<Sample> {
    if cap == 0 {
        return Vec::new();
    }
    if samples.len() <= cap {
        return samples.to_vec();
    }

    let len = samples.len();
    let mut result = Vec::with_capacity(cap);
    for i in 0..cap {
        let index = (i * len / cap).min(len - 1);
        result.push(samples[index]);
    }

    // Decimation may skip the newest entry; pin it.
    let last = samples[len - 1];
    if result.last().map(|s| s.timestamp) != Some(last.timestamp) {
        let end = result.len() - 1;
        result[end] = last;
    }

    result
}

/// Min/max temperature over the given samples, padded and clamped for display.
///
/// Returns [`DEFAULT_TEMP_RANGE`] when no sample carries a temperature.
pub fn temperature_range(samples: &[Sample]) -> (f32, f32) {
    let mut min: Option<f32> = None;
    let mut max: Option<f32> = None;
    for s in samples {
        if let Some(t) = s.temperature_celsius {
            min = Some(min.map_or(t, |m| m.min(t)));
            max = Some(max.map_or(t, |m| m.max(t)));
        }
    }

    match (min, max) {
        (Some(lo), Some(hi)) => (
            (lo - RANGE_MARGIN).max(RANGE_FLOOR),
            (hi + RANGE_MARGIN).min(RANGE_CEIL),
        ),
        _ => DEFAULT_TEMP_RANGE,
    }
}

/// Total time spent at each pressure level, sorted by descending duration.
///
/// The state recorded at sample `i` holds until sample `i + 1`; the last
/// sample's state holds until `now`. The durations therefore partition
/// `now - first.timestamp` exactly, even though display downsampling is
/// lossy — this always runs over the full history.
pub fn time_in_each_state(samples: &[Sample], now: DateTime<Utc>) -> Vec<(PressureLevel, Duration)> {
    let mut durations: HashMap<PressureLevel, Duration> = HashMap::new();

    for pair in samples.windows(2) {
        let span = pair[1].timestamp - pair[0].timestamp;
        *durations.entry(pair[0].pressure).or_insert(Duration::zero()) += span;
    }

    if let Some(last) = samples.last() {
        let span = now - last.timestamp;
        *durations.entry(last.pressure).or_insert(Duration::zero()) += span;
    }

    let mut entries: Vec<(PressureLevel, Duration)> = durations.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// Step-function lookup: the sample whose state was in force at the instant
/// `fraction` of the way across `[first.timestamp, now]`.
///
/// Returns the last sample with `timestamp <= target`, falling back to the
/// first sample when none qualifies.
pub fn sample_at_fraction(
    samples: &[Sample],
    now: DateTime<Utc>,
    fraction: f64,
) -> Option<Sample> {
    let first = *samples.first()?;
    let span = now - first.timestamp;
    if span <= Duration::zero() {
        return Some(first);
    }

    let f = fraction.clamp(0.0, 1.0);
    let offset_ms = (span.num_milliseconds() as f64 * f).round() as i64;
    let target = first.timestamp + Duration::milliseconds(offset_ms);

    samples
        .iter()
        .rev()
        .find(|s| s.timestamp <= target)
        .copied()
        .or(Some(first))
}
