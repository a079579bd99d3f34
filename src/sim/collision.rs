//! Contact detection and response
//!
//! The only contact pairs in this world are coin-vs-segment and
//! coin-vs-coin. Contacts are resolved with positional correction plus an
//! impulse carrying restitution and Coulomb friction; tangential slip feeds
//! a little spin into the coin so piles tumble believably.

use glam::Vec2;

use super::body::{Body, Segment};

/// Impacts slower than this along the normal do not bounce; restitution on
/// crawl-speed contacts keeps piles jittering forever.
const BOUNCE_THRESHOLD: f32 = 40.0;

/// Tangential speed below which static friction applies instead of sliding
/// friction.
const STICK_SPEED: f32 = 10.0;

/// How strongly tangential slip at a contact converts into spin.
const SPIN_COUPLING: f32 = 0.25;

/// A detected contact. The normal points in the direction that separates the
/// first body from the other geometry.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub normal: Vec2,
    pub penetration: f32,
}

/// Contact between a circle and a static segment, if they overlap
pub fn circle_segment_contact(pos: Vec2, radius: f32, seg: &Segment) -> Option<Contact> {
    let closest = seg.closest_point(pos);
    let offset = pos - closest;
    let dist_sq = offset.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-6 {
        offset / dist
    } else {
        // Center exactly on the segment; push perpendicular to it
        let line = (seg.b - seg.a).normalize_or_zero();
        Vec2::new(-line.y, line.x)
    };
    Some(Contact {
        normal,
        penetration: radius - dist,
    })
}

/// Contact between two circles, if they overlap. Normal points from `a`
/// toward `b`.
pub fn circle_circle_contact(pa: Vec2, ra: f32, pb: Vec2, rb: f32) -> Option<Contact> {
    let offset = pb - pa;
    let dist_sq = offset.length_squared();
    let min_dist = ra + rb;
    if dist_sq >= min_dist * min_dist {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-6 {
        offset / dist
    } else {
        // Perfectly coincident centers; pick a fixed separation axis
        Vec2::Y
    };
    Some(Contact {
        normal,
        penetration: min_dist - dist,
    })
}

/// Resolve a coin against immovable geometry
pub fn resolve_static_contact(body: &mut Body, contact: &Contact, static_friction: f32) {
    let n = contact.normal;

    // Push fully out of the surface
    body.pos += n * contact.penetration;

    let vn = body.vel.dot(n);
    if vn >= 0.0 {
        return; // Already separating
    }

    let restitution = if -vn > BOUNCE_THRESHOLD {
        body.restitution
    } else {
        0.0
    };

    // Normal impulse (per unit mass; the wall never moves)
    let jn = -(1.0 + restitution) * vn;
    body.vel += n * jn;

    // Coulomb friction along the tangent
    let t = Vec2::new(-n.y, n.x);
    let vt = body.vel.dot(t);
    let mu = if vt.abs() < STICK_SPEED {
        static_friction
    } else {
        body.friction
    };
    let jt = (-vt).clamp(-mu * jn, mu * jn);
    body.vel += t * jt;

    // Residual slip spins the coin about the contact
    let slip = vt + jt;
    body.angular_vel += SPIN_COUPLING * slip / body.radius;
}

/// Resolve two overlapping coins against each other
pub fn resolve_pair_contact(a: &mut Body, b: &mut Body, contact: &Contact) {
    let n = contact.normal;
    let inv_mass_sum = a.inv_mass + b.inv_mass;
    if inv_mass_sum <= 0.0 {
        return;
    }

    // Split the positional correction by inverse mass
    let correction = n * (contact.penetration / inv_mass_sum);
    a.pos -= correction * a.inv_mass;
    b.pos += correction * b.inv_mass;

    let rel = b.vel - a.vel;
    let vn = rel.dot(n);
    if vn >= 0.0 {
        return;
    }

    let restitution = if -vn > BOUNCE_THRESHOLD {
        a.restitution.min(b.restitution)
    } else {
        0.0
    };

    let jn = -(1.0 + restitution) * vn / inv_mass_sum;
    a.vel -= n * (jn * a.inv_mass);
    b.vel += n * (jn * b.inv_mass);

    // Friction on the relative tangential motion
    let t = Vec2::new(-n.y, n.x);
    let vt = (b.vel - a.vel).dot(t);
    let mu = if vt.abs() < STICK_SPEED {
        a.friction.max(b.friction)
    } else {
        a.friction.min(b.friction)
    };
    let jt = (-vt).clamp(-mu * jn, mu * jn) / inv_mass_sum;
    a.vel -= t * (jt * a.inv_mass);
    b.vel += t * (jt * b.inv_mass);

    // Opposite spin on each side of the contact
    let slip = vt;
    a.angular_vel -= SPIN_COUPLING * slip / a.radius;
    b.angular_vel += SPIN_COUPLING * slip / b.radius;
}
