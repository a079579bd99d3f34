//! Vessel boundary geometry
//!
//! The vessel is drawn as a circle; physically it is the lower hemisphere of
//! that circle approximated by short static segments, with two vertical side
//! walls rising from the rim so coins dropped from above cannot escape
//! sideways. Everything is offset outward by a small margin so settled coins
//! sit flush with the drawn mask instead of floating inset from it.
//!
//! Pure geometry generation; called exactly once per engine lifetime.

use crate::config::EngineConfig;
use crate::polar_to_cartesian;

use super::body::Segment;

/// Number of chords approximating the hemisphere arc
const ARC_SEGMENTS: usize = 24;

/// Build the vessel's static collider set: hemisphere floor plus side walls
pub fn build_boundary(config: &EngineConfig) -> Vec<Segment> {
    let r = config.boundary_radius();
    let wall_top = config.wall_top();

    let mut segments = Vec::with_capacity(ARC_SEGMENTS + 2);

    // Lower hemisphere, left rim (-r, 0) around the bottom to right rim (r, 0)
    let mut prev = polar_to_cartesian(r, std::f32::consts::PI);
    for i in 1..=ARC_SEGMENTS {
        let t = i as f32 / ARC_SEGMENTS as f32;
        let theta = std::f32::consts::PI * (1.0 + t);
        let next = polar_to_cartesian(r, theta);
        segments.push(Segment::new(prev, next));
        prev = next;
    }

    // Vertical side walls from each rim upward
    segments.push(Segment::new(
        glam::Vec2::new(-r, 0.0),
        glam::Vec2::new(-r, wall_top),
    ));
    segments.push(Segment::new(
        glam::Vec2::new(r, 0.0),
        glam::Vec2::new(r, wall_top),
    ));

    segments
}
