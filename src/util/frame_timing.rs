//! Frame pacing: a windowed FPS counter and an optional frame limiter.

use web_time::{Duration, Instant};

/// Windowed frames-per-second counter.
///
/// Counts frames and publishes `round(frames / elapsed)` once at least a
/// second has passed, then starts a fresh window. The published value is
/// stable between updates, which keeps window-title displays readable.
pub struct FpsCounter {
    fps: u32,
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    /// Start counting from now with no published value yet.
    #[must_use]
    pub fn new() -> Self {
        Self { fps: 0, frames: 0, since: Instant::now() }
    }

    /// Count one frame, publishing a new rate if the window elapsed.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.duration_since(self.since).as_secs_f64();
        if elapsed >= 1.0 {
            self.fps = (f64::from(self.frames) / elapsed).round() as u32;
            self.frames = 0;
            self.since = now;
        }
    }

    /// Most recently published frames-per-second value.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame limiter holding the render loop to a target FPS.
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
}

impl FrameTiming {
    /// Create a new frame limiter with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            last_frame: Instant::now(),
        }
    }

    /// Call at the start of each frame. Returns true if enough time has
    /// passed to render.
    #[must_use]
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Call after rendering to reset the frame window.
    pub fn end_frame(&mut self) {
        self.last_frame = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_counter_publishes_after_window() {
        let start = Instant::now();
        let mut counter = FpsCounter { fps: 0, frames: 0, since: start };
        for _ in 0..59 {
            counter.tick_at(start + Duration::from_millis(500));
        }
        // Window has not elapsed yet.
        assert_eq!(counter.fps(), 0);
        // 60th frame lands two seconds in: 60 frames / 2 s.
        counter.tick_at(start + Duration::from_secs(2));
        assert_eq!(counter.fps(), 30);
    }

    #[test]
    fn fps_counter_resets_between_windows() {
        let start = Instant::now();
        let mut counter = FpsCounter { fps: 0, frames: 0, since: start };
        counter.tick_at(start + Duration::from_secs(1));
        assert_eq!(counter.fps(), 1);
        // One frame in the next one-second window.
        counter.tick_at(start + Duration::from_secs(2));
        assert_eq!(counter.fps(), 1);
    }

    #[test]
    fn fps_counter_rounds_rate() {
        let start = Instant::now();
        let mut counter = FpsCounter { fps: 0, frames: 0, since: start };
        for _ in 0..2 {
            counter.tick_at(start + Duration::from_millis(600));
        }
        counter.tick_at(start + Duration::from_millis(1200));
        // 3 frames / 1.2 s = 2.5, rounds half away from zero.
        assert_eq!(counter.fps(), 3);
    }

    #[test]
    fn unlimited_always_renders() {
        let timing = FrameTiming::new(0);
        assert!(timing.should_render());
    }

    #[test]
    fn limiter_blocks_inside_frame_window() {
        let timing = FrameTiming::new(30);
        // A 33ms window cannot elapse between these two statements.
        assert!(!timing.should_render());
    }
}
