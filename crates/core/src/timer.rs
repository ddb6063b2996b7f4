//! Frame timer feeding the per-pass time constants.

use std::time::{Duration, Instant};

/// Game timer tracking total and per-frame elapsed time.
///
/// [`tick`](Self::tick) samples the wall clock; [`advance`](Self::advance)
/// steps the timer by a fixed amount, which keeps headless runs and tests
/// deterministic.
#[derive(Debug)]
pub struct GameTimer {
    last_tick: Instant,
    total: Duration,
    delta: Duration,
}

impl GameTimer {
    /// Create a new timer, starting from now.
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            total: Duration::ZERO,
            delta: Duration::ZERO,
        }
    }

    /// Sample the clock and return the time elapsed since the previous tick.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last_tick;
        self.last_tick = now;
        self.advance(delta);
        delta
    }

    /// Step the timer by `delta` without touching the wall clock.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.total += delta;
    }

    /// Total accumulated time in seconds.
    pub fn total_time(&self) -> f32 {
        self.total.as_secs_f32()
    }

    /// Duration of the last frame in seconds.
    pub fn delta_time(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Reset the timer to the current time.
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
        self.total = Duration::ZERO;
        self.delta = Duration::ZERO;
    }
}

impl Default for GameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates_total() {
        let mut timer = GameTimer::new();
        timer.advance(Duration::from_millis(250));
        timer.advance(Duration::from_millis(500));

        assert!((timer.total_time() - 0.75).abs() < 1e-6);
        assert!((timer.delta_time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tick_is_monotonic() {
        let mut timer = GameTimer::new();
        timer.tick();
        let first = timer.total_time();
        timer.tick();
        assert!(timer.total_time() >= first);
        assert!(timer.delta_time() >= 0.0);
    }

    #[test]
    fn test_reset_clears_time() {
        let mut timer = GameTimer::new();
        timer.advance(Duration::from_secs(3));
        timer.reset();
        assert_eq!(timer.total_time(), 0.0);
        assert_eq!(timer.delta_time(), 0.0);
    }
}
