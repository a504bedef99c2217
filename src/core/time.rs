//! Frame timing utilities

use std::time::{Duration, Instant};

/// Tracks frame timing, total elapsed time and FPS
pub struct FrameTimer {
    started: Instant,
    last_frame: Instant,
    frame_count: u64,
    fps_timer: Instant,
    fps: f32,
    fps_frame_count: u32,
    /// How often the FPS figure is recomputed
    fps_interval: Duration,
}

impl FrameTimer {
    /// Create a new frame timer that refreshes FPS every `fps_interval`
    pub fn new(fps_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            frame_count: 0,
            fps_timer: now,
            fps: 0.0,
            fps_frame_count: 0,
            fps_interval,
        }
    }

    /// Call once per frame to update timing.
    ///
    /// Returns `true` when the FPS figure was refreshed on this tick.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> bool {
        self.last_frame = now;
        self.frame_count += 1;
        self.fps_frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_timer);
        if fps_elapsed >= self.fps_interval && !fps_elapsed.is_zero() {
            self.fps = self.fps_frame_count as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_timer = now;
            return true;
        }
        false
    }

    /// Seconds since the timer was created, as of the last tick
    pub fn elapsed_secs(&self) -> f64 {
        self.last_frame.duration_since(self.started).as_secs_f64()
    }

    /// Current FPS (refreshed every `fps_interval`)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counts_frames() {
        let mut timer = FrameTimer::default();
        let start = timer.last_frame;
        timer.tick_at(start + Duration::from_millis(16));
        timer.tick_at(start + Duration::from_millis(32));

        assert_eq!(timer.frame_count(), 2);
        assert!((timer.elapsed_secs() - 0.032).abs() < 1e-9);
    }

    #[test]
    fn test_fps_refresh() {
        let mut timer = FrameTimer::new(Duration::from_secs(1));
        let start = timer.last_frame;

        for i in 1..60 {
            assert!(!timer.tick_at(start + Duration::from_millis(i * 10)));
        }
        assert_eq!(timer.fps(), 0.0);

        // 100th frame lands exactly on the one second boundary
        for i in 60..100 {
            timer.tick_at(start + Duration::from_millis(i * 10));
        }
        assert!(timer.tick_at(start + Duration::from_millis(1000)));
        assert!((timer.fps() - 100.0).abs() < 0.01);
    }
}
