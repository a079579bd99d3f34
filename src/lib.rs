//! Coinpile - a settling-coin pile simulator
//!
//! Renders a monotonically-changing count as a pile of physically-settling
//! coins inside a circular vessel. The host supplies a target count whenever
//! it changes; the engine reconciles its live coin set against that target,
//! steps a small 2D physics world at a fixed timestep until the pile comes
//! to rest, and publishes an ordered render snapshot on every step.
//!
//! Core modules:
//! - `sim`: deterministic simulation (bodies, collisions, engine loop)
//! - `config`: construction-time tunables
//! - `variant`: weighted catalogue of coin appearances
//!
//! The simulation must stay pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by creation order)
//! - No rendering or platform dependencies

pub mod config;
pub mod sim;
pub mod variant;

pub use config::EngineConfig;
pub use sim::{CoinId, CoinRenderState, Engine, LoopState, Snapshot};
pub use variant::CoinVariant;

use glam::Vec2;

/// Normalize an angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
