//! Render-state projection
//!
//! Converts raw body state into the per-frame contract handed to the
//! presentation layer: draw order by creation, rotation clamped so no coin
//! ever renders toppled, and a painter's-algorithm depth cue expressed as
//! brightness/contrast attenuation. Pure function of the current state;
//! recomputed every step and safe to call every frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::normalize_angle;
use crate::variant::CoinVariant;

use super::body::Body;
use super::engine::Coin;

/// One coin as the renderer should draw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRenderState {
    pub position: Vec2,
    /// Display rotation, clamped to the configured tilt range
    pub rotation_degrees: f32,
    pub variant: CoinVariant,
    /// Depth cue: 1.0 for the top coin, dimmer toward the bottom of the pile
    pub brightness: f32,
    /// Depth cue companion to brightness
    pub contrast: f32,
}

/// Ordered draw list, oldest coin first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub coins: Vec<CoinRenderState>,
}

/// Wrap a physics angle into [-π, π), then clamp to the display tilt range
pub fn clamp_rotation(angle: f32, max_tilt: f32) -> f32 {
    normalize_angle(angle).clamp(-max_tilt, max_tilt)
}

/// Project the live bodies and their presentation metadata into a draw list.
///
/// `bodies` and `coins` are parallel slices in creation order; the engine
/// maintains that invariant.
pub fn project(bodies: &[Body], coins: &[Coin], config: &EngineConfig) -> Snapshot {
    debug_assert_eq!(bodies.len(), coins.len());

    let n = bodies.len();
    let entries = bodies
        .iter()
        .zip(coins)
        .enumerate()
        .map(|(i, (body, coin))| {
            debug_assert_eq!(body.id, coin.id);

            // Depth 0 is the oldest (bottom) coin; the newest draws last and
            // fully lit
            let depth_t = if n <= 1 {
                1.0
            } else {
                i as f32 / (n - 1) as f32
            };
            let brightness =
                config.depth_brightness_floor + (1.0 - config.depth_brightness_floor) * depth_t;
            let contrast =
                config.depth_contrast_floor + (1.0 - config.depth_contrast_floor) * depth_t;

            CoinRenderState {
                position: body.pos,
                rotation_degrees: clamp_rotation(body.angle, config.max_tilt()).to_degrees(),
                variant: coin.variant,
                brightness,
                contrast,
            }
        })
        .collect();

    Snapshot { coins: entries }
}
