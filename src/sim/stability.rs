//! Rest detection
//!
//! Watches the fastest coin speed over a sliding window and decides when the
//! pile is visually at rest. A warm-up period keeps a freshly-dropped pile
//! from being declared stable while it is still mid-air, and a single hot
//! frame resets the calm streak.

/// Sliding-window rest detector. Owns only its counters; speeds are fed in
/// by the engine each frame.
#[derive(Debug, Clone)]
pub struct StabilityDetector {
    warmup_frames: u32,
    speed_threshold: f32,
    required_calm: u32,
    frames_observed: u32,
    calm_streak: u32,
}

impl StabilityDetector {
    pub fn new(warmup_frames: u32, speed_threshold: f32, required_calm: u32) -> Self {
        Self {
            warmup_frames,
            speed_threshold,
            required_calm,
            frames_observed: 0,
            calm_streak: 0,
        }
    }

    /// Forget all history; called whenever the pile is disturbed
    pub fn reset(&mut self) {
        self.frames_observed = 0;
        self.calm_streak = 0;
    }

    /// Feed one frame's fastest coin speed; returns true once the pile has
    /// been calm long enough
    pub fn observe(&mut self, max_speed: f32) -> bool {
        self.frames_observed += 1;
        if self.frames_observed <= self.warmup_frames {
            return false;
        }

        if max_speed < self.speed_threshold {
            self.calm_streak += 1;
        } else {
            self.calm_streak = 0;
        }

        self.calm_streak >= self.required_calm
    }
}
