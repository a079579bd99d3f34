//! Engine tunables
//!
//! Everything here is fixed at `Engine` construction and never mutated at
//! runtime. Distances are in logical pixels, speeds in pixels per second,
//! angles in radians unless a name says otherwise.

use serde::{Deserialize, Serialize};

/// Construction-time configuration for one simulation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Radius of the circular vessel the pile settles into
    pub vessel_radius: f32,
    /// Visual diameter of one coin
    pub coin_diameter: f32,
    /// Downward gravity magnitude (pixels/s²)
    pub gravity: f32,
    /// Fixed simulation timestep (60 Hz)
    pub dt: f32,
    /// Delay between consecutive staggered coin insertions (seconds)
    pub stagger_secs: f32,

    // === Stability detection ===
    /// Frames ignored after a wake before rest detection starts
    pub warmup_frames: u32,
    /// Speed below which a coin counts as calm (pixels/s)
    pub speed_threshold: f32,
    /// Consecutive calm frames required to declare the pile at rest
    pub stable_frames: u32,
    /// Hard cap on frames per wake; forces the loop idle regardless of motion
    pub frame_ceiling: u32,

    // === Pile capacity & presentation ===
    /// Maximum live coins; targets above this saturate
    pub max_coins: usize,
    /// Published rotation is clamped to ± this many degrees
    pub max_tilt_degrees: f32,
    /// Brightness of the lowest coin in the draw order (top coin is 1.0)
    pub depth_brightness_floor: f32,
    /// Contrast of the lowest coin in the draw order (top coin is 1.0)
    pub depth_contrast_floor: f32,

    // === Geometry fractions ===
    /// Boundary is pushed outward by this fraction of the vessel radius so
    /// coins sit flush with the drawn circular mask
    pub wall_margin_frac: f32,
    /// Collision radius as a fraction of the visual radius; < 1 lets drawn
    /// coins overlap slightly so the pile reads as dense
    pub collision_radius_frac: f32,
    /// Spawn x jitter as a fraction of the coin diameter
    pub spawn_jitter_frac: f32,

    // === Body material ===
    /// Sliding friction coefficient
    pub friction: f32,
    /// Friction applied below the sticking speed
    pub static_friction: f32,
    /// Bounce energy retention on impact
    pub restitution: f32,
    /// Mass per unit area; kept low so a full pile stays integrable
    pub density: f32,
    /// Maximum magnitude of the randomized initial spin (radians/s)
    pub initial_spin: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vessel_radius: 140.0,
            coin_diameter: 28.0,
            gravity: 900.0,
            dt: 1.0 / 60.0,
            stagger_secs: 0.1,

            warmup_frames: 50,
            speed_threshold: 4.0,
            stable_frames: 25,
            frame_ceiling: 200,

            max_coins: 40,
            max_tilt_degrees: 30.0,
            depth_brightness_floor: 0.82,
            depth_contrast_floor: 0.90,

            wall_margin_frac: 0.05,
            collision_radius_frac: 0.85,
            spawn_jitter_frac: 0.35,

            friction: 0.8,
            static_friction: 0.9,
            restitution: 0.2,
            density: 0.001,
            initial_spin: 3.0,
        }
    }
}

impl EngineConfig {
    /// Visual coin radius
    #[inline]
    pub fn coin_radius(&self) -> f32 {
        self.coin_diameter / 2.0
    }

    /// Collision radius (slightly smaller than visual, see `collision_radius_frac`)
    #[inline]
    pub fn collision_radius(&self) -> f32 {
        self.coin_radius() * self.collision_radius_frac
    }

    /// Boundary radius: vessel radius plus the outward margin
    #[inline]
    pub fn boundary_radius(&self) -> f32 {
        self.vessel_radius * (1.0 + self.wall_margin_frac)
    }

    /// Spawn height above the vessel, off-screen so coins visibly fall in
    #[inline]
    pub fn spawn_height(&self) -> f32 {
        self.vessel_radius + self.coin_diameter * 2.0
    }

    /// Vertical spacing between coins seeded in one bulk batch
    #[inline]
    pub fn spawn_spacing(&self) -> f32 {
        self.coin_diameter * 0.6
    }

    /// Top of the side walls: tall enough to fence a full bulk-seed column
    #[inline]
    pub fn wall_top(&self) -> f32 {
        self.spawn_height() + self.max_coins as f32 * self.spawn_spacing() + self.coin_diameter
    }

    /// Stagger interval in whole simulation ticks (at least one)
    #[inline]
    pub fn stagger_ticks(&self) -> u64 {
        ((self.stagger_secs / self.dt).round() as u64).max(1)
    }

    /// Rotation clamp in radians
    #[inline]
    pub fn max_tilt(&self) -> f32 {
        self.max_tilt_degrees.to_radians()
    }

    /// Mass of one coin at the configured density and collision radius
    #[inline]
    pub fn coin_mass(&self) -> f32 {
        let r = self.collision_radius();
        self.density * std::f32::consts::PI * r * r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_sane() {
        let cfg = EngineConfig::default();
        assert!(cfg.collision_radius() < cfg.coin_radius());
        assert!(cfg.boundary_radius() > cfg.vessel_radius);
        assert!(cfg.spawn_height() > cfg.vessel_radius);
        assert!(cfg.wall_top() > cfg.spawn_height());
        assert!(cfg.coin_mass() > 0.0);
    }

    #[test]
    fn test_stagger_ticks() {
        let cfg = EngineConfig::default();
        // 100 ms at 60 Hz is 6 ticks
        assert_eq!(cfg.stagger_ticks(), 6);

        // Degenerate stagger still schedules at least one tick apart
        let cfg = EngineConfig {
            stagger_secs: 0.0,
            ..Default::default()
        };
        assert_eq!(cfg.stagger_ticks(), 1);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let cfg = EngineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.max_coins, back.max_coins);
        assert!((cfg.gravity - back.gravity).abs() < f32::EPSILON);
    }
}
