//! Frame timing for the tick loop.

use std::time::{Duration, Instant};

/// Longest step a single frame may advance the simulation by.
/// Window drags and breakpoints otherwise turn into one giant tick.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Manages frame timing and delta time calculation.
///
/// `update` samples the wall clock; `advance` steps by an explicit amount so
/// tests and scripted sessions run on simulated time only.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame (clamped).
    delta: Duration,
    /// Total simulated time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update timing from the wall clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw = now - self.last_frame;
        self.last_frame = now;
        self.advance(raw);
    }

    /// Advance simulated time by `delta` (clamped to [`MAX_FRAME_DELTA`]).
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta.min(MAX_FRAME_DELTA);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_elapsed() {
        let mut t = Time::new();
        t.advance(Duration::from_millis(16));
        t.advance(Duration::from_millis(16));
        assert_eq!(t.frame_count(), 2);
        assert!((t.elapsed_seconds() - 0.032).abs() < 1e-6);
    }

    #[test]
    fn advance_clamps_long_stalls() {
        let mut t = Time::new();
        t.advance(Duration::from_secs(3));
        assert_eq!(t.delta(), MAX_FRAME_DELTA);
    }
}
