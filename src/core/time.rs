//! Simulation time
//!
//! All pools measure time in integer milliseconds (`Tick`) and integrate
//! motion with a per-frame delta in seconds.

/// Simulation time in milliseconds.
pub type Tick = u64;

/// Fixed or variable step clock feeding `(tick, delta_seconds)` into pool updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    now: Tick,
    last_delta_ms: u64,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock starting at tick 0
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a clock starting at the given tick
    #[must_use]
    pub const fn starting_at(tick: Tick) -> Self {
        Self {
            now: tick,
            last_delta_ms: 0,
            frame_count: 0,
        }
    }

    /// Advance by `delta_ms` and return the new tick and the delta in seconds.
    pub fn advance(&mut self, delta_ms: u64) -> (Tick, f32) {
        self.now = self.now.saturating_add(delta_ms);
        self.last_delta_ms = delta_ms;
        self.frame_count += 1;
        (self.now, self.delta_seconds())
    }

    /// Current tick
    #[must_use]
    pub const fn now(&self) -> Tick {
        self.now
    }

    /// Delta of the most recent frame in seconds
    #[must_use]
    pub fn delta_seconds(&self) -> f32 {
        self.last_delta_ms as f32 / 1000.0
    }

    /// Number of frames advanced so far
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advance() {
        let mut clock = FrameClock::starting_at(1000);
        let (tick, dt) = clock.advance(16);

        assert_eq!(tick, 1016);
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_clock_saturates() {
        let mut clock = FrameClock::starting_at(u64::MAX - 1);
        let (tick, _) = clock.advance(10);
        assert_eq!(tick, u64::MAX);
    }
}
