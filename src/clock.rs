//! Frame clock

use std::time::{Duration, Instant};

/// Monotonic elapsed time, sampled once per tick.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    elapsed: f32,
    frame: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Advance to the current instant and return elapsed seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Advance to `now`. Never moves backwards.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = now
            .checked_duration_since(self.start)
            .unwrap_or(Duration::ZERO)
            .as_secs_f32();
        self.elapsed = self.elapsed.max(elapsed);
        self.frame += 1;
        self.elapsed
    }

    /// Seconds at the last tick
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of ticks so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_is_monotonic() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        assert_eq!(clock.tick_at(start + Duration::from_millis(500)), 0.5);
        // An earlier instant does not rewind the clock
        assert_eq!(clock.tick_at(start + Duration::from_millis(100)), 0.5);
        assert_eq!(clock.tick_at(start + Duration::from_secs(2)), 2.0);
        assert_eq!(clock.frame(), 3);
    }

    #[test]
    fn test_new_clock_starts_at_zero() {
        let clock = FrameClock::new();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.frame(), 0);
    }
}
