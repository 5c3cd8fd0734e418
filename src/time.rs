//! Frame timing.
//!
//! One source of truth for elapsed and delta time. The delta is clamped to
//! [`MAX_FRAME_DELTA`]: after a stall (debugger, window drag, suspend) the
//! first frame back would otherwise integrate a huge step and fling every
//! particle off into space.

use std::time::{Duration, Instant};

/// Largest frame delta the simulation will integrate, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Elapsed/delta tracking for the frame loop.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    paused: bool,
    pause_elapsed: Duration,
    /// Fixed delta for deterministic stepping (tests, capture).
    fixed_delta: Option<f32>,
}

impl Time {
    /// Start the clock now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            paused: false,
            pause_elapsed: Duration::ZERO,
            fixed_delta: None,
        }
    }

    /// Advance one frame. Returns `(elapsed, delta)`, with `delta` already
    /// clamped to [`MAX_FRAME_DELTA`].
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, 0.0);
        }

        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self
            .fixed_delta
            .unwrap_or(raw_delta)
            .clamp(0.0, MAX_FRAME_DELTA);
        self.last_frame = now;

        let raw_elapsed = now.duration_since(self.start) - self.pause_elapsed;
        self.elapsed_secs = raw_elapsed.as_secs_f32();
        self.frame_count += 1;

        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds since start, excluding pauses.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Clamped seconds since the previous frame.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames advanced since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze time; `update` returns a zero delta until resumed.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after a pause without integrating the gap.
    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_elapsed += now.duration_since(self.last_frame);
            self.last_frame = now;
            self.paused = false;
        }
    }

    /// Use a fixed delta every frame instead of wall-clock time. Pass
    /// `None` to go back to real timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Restart the clock from zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn fresh_clock() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert!(!time.is_paused());
        assert_eq!(time.delta(), 0.0);
    }

    #[test]
    fn update_advances() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();
        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn delta_is_clamped_after_a_stall() {
        let mut time = Time::new();
        // Simulate a long stall through the fixed-delta override.
        time.set_fixed_delta(Some(5.0));
        let (_, delta) = time.update();
        assert_eq!(delta, MAX_FRAME_DELTA);
    }

    #[test]
    fn pause_stops_the_clock() {
        let mut time = Time::new();
        time.update();
        time.pause();

        let elapsed_before = time.elapsed();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert_eq!(elapsed, elapsed_before);
        assert_eq!(delta, 0.0);
    }

    #[test]
    fn fixed_delta_is_deterministic() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(1.0 / 60.0));
        thread::sleep(Duration::from_millis(30));
        let (_, delta) = time.update();
        assert!((delta - 1.0 / 60.0).abs() < 1e-6);
    }
}
