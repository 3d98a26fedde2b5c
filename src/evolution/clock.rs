//! Time sources for birth and death timestamps
//!
//! Both clocks report time in their own unit; fitness treats anything shorter
//! than one unit as one unit.

use web_time::Instant;

/// Monotonic time source injected into the generation controller
pub trait Clock: Send {
    /// Current time in clock units
    fn now(&self) -> f64;

    /// Called once at the start of every simulation frame
    fn advance(&mut self) {}
}

/// Logical clock counting simulation frames
///
/// Deterministic, so runs with equal seeds produce equal fitness values.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for FrameClock {
    fn now(&self) -> f64 {
        self.frames as f64
    }

    fn advance(&mut self) {
        self.frames += 1;
    }
}

/// Real time in milliseconds since the clock was created
#[derive(Debug, Clone)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_counts_frames() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.now(), 0.0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.now(), 2.0);
    }

    #[test]
    fn test_wall_clock_is_monotonic() {
        let mut clock = WallClock::new();
        let a = clock.now();
        clock.advance();
        let b = clock.now();
        assert!(b >= a);
    }
}
