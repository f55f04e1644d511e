use crate::math::tps_to_tick_ms;

/// Fixed-timestep accumulator.
///
/// Real elapsed time is banked in milliseconds and drained in whole ticks, so
/// the number of ticks run over any interval tracks the configured rate no
/// matter how irregularly `advance` is called.
#[derive(Clone, Debug, Default)]
pub struct TickScheduler {
    banked_ms: f64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank `delta_seconds` and return how many whole ticks are now owed.
    ///
    /// Negative or non-finite deltas bank nothing, nor do deltas too large to
    /// bank as a finite number of milliseconds. There is no cap on the
    /// returned count; a long pause is paid back in one burst (saturating at
    /// `u64::MAX`).
    pub fn advance(&mut self, delta_seconds: f64, ticks_per_second: f64) -> u64 {
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            let banked = self.banked_ms + delta_seconds * 1000.0;
            if banked.is_finite() {
                self.banked_ms = banked;
            }
        }

        let tick_ms = tps_to_tick_ms(ticks_per_second);
        if self.banked_ms < tick_ms {
            return 0;
        }
        // Drained by division; repeated subtraction stalls once banked_ms
        // dwarfs tick_ms
        let ticks = (self.banked_ms / tick_ms).floor() as u64;
        self.banked_ms %= tick_ms;
        ticks
    }

    /// Time banked toward the next tick.
    pub fn banked_ms(&self) -> f64 {
        self.banked_ms
    }
}
