//! Numeric helpers shared by the scheduler and the runner.

use crate::config::{
    MAX_AGE_DECAY_PER_STEP, MAX_TICKS_PER_SECOND, MIN_AGE_DECAY_PER_STEP,
    MIN_AGE_DURATION_SECONDS, MIN_TICKS_PER_SECOND,
};

/// Clamp `value` to `[min, max]`.
///
/// Unlike `f64::clamp` this never panics when `min > max`; `max` wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Duration of one tick in milliseconds after clamping the rate to the supported range.
pub fn tps_to_tick_ms(ticks_per_second: f64) -> f64 {
    let tps = clamp(ticks_per_second, MIN_TICKS_PER_SECOND, MAX_TICKS_PER_SECOND);
    1000.0 / tps
}

/// Per-pass age decay so a newborn cell fades from 1.0 to 0.0 in roughly
/// `age_duration_seconds`, given the tick rate and passes per tick.
pub fn compute_age_decay_per_step(
    age_duration_seconds: f64,
    ticks_per_second: f64,
    steps_per_tick: f64,
) -> f32 {
    let secs = age_duration_seconds.max(MIN_AGE_DURATION_SECONDS);
    let tps = ticks_per_second.max(MIN_TICKS_PER_SECOND);
    let spt = steps_per_tick.floor().max(1.0);
    let total_steps = secs * tps * spt;

    clamp(
        1.0 / total_steps,
        MIN_AGE_DECAY_PER_STEP as f64,
        MAX_AGE_DECAY_PER_STEP as f64,
    ) as f32
}
