//! Physical body types
//!
//! Two kinds of geometry exist in the world: dynamic circles (coins) and
//! static line segments (the vessel). Coins carry a stable identifier that
//! doubles as creation order; the reconciler and the render projector only
//! ever speak in these identifiers, never in storage indices.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable coin identifier, assigned monotonically at creation.
///
/// Identifiers are never reused within one engine, so ordering by id is
/// ordering by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoinId(pub u32);

/// A dynamic circular body
#[derive(Debug, Clone)]
pub struct Body {
    pub id: CoinId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Orientation in radians; unbounded here, clamped at projection time
    pub angle: f32,
    pub angular_vel: f32,
    /// Collision radius (smaller than the drawn radius)
    pub radius: f32,
    pub inv_mass: f32,
    pub friction: f32,
    pub restitution: f32,
}

/// A static collider segment from `a` to `b`
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let line = self.b - self.a;
        let len_sq = line.length_squared();
        if len_sq < 1e-8 {
            return self.a;
        }
        let t = ((p - self.a).dot(line) / len_sq).clamp(0.0, 1.0);
        self.a + line * t
    }
}
