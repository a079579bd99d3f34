//! Physics world
//!
//! Owns the static vessel geometry and the dynamic coin set, and advances
//! them with semi-implicit Euler integration plus an iterative contact
//! solve. Coin counts are small (40 max) so the naive O(n²) pair pass is
//! fine; a broadphase would be noise here.

use glam::Vec2;

use super::body::{Body, CoinId, Segment};
use super::collision::{
    circle_circle_contact, circle_segment_contact, resolve_pair_contact, resolve_static_contact,
};

/// Contact solver passes per step
const SOLVER_ITERATIONS: usize = 4;

/// Per-step angular velocity retention; spin bleeds off on its own
const ANGULAR_DAMPING: f32 = 0.98;

/// A 2D world of static segments and dynamic circles
#[derive(Debug)]
pub struct World {
    gravity: Vec2,
    static_friction: f32,
    statics: Vec<Segment>,
    bodies: Vec<Body>,
}

impl World {
    /// Create a world around an already-built boundary
    pub fn new(gravity: Vec2, static_friction: f32, statics: Vec<Segment>) -> Self {
        Self {
            gravity,
            static_friction,
            statics,
            bodies: Vec::new(),
        }
    }

    /// Insert a dynamic body. The boundary must exist first; a bare world
    /// would let coins fall forever, which is a construction bug.
    pub fn spawn(&mut self, body: Body) {
        debug_assert!(
            !self.statics.is_empty(),
            "spawned a coin into a world with no boundary"
        );
        debug_assert!(
            self.bodies.last().is_none_or(|b| b.id < body.id),
            "coin ids must be inserted in creation order"
        );
        self.bodies.push(body);
    }

    /// Remove a body by id. Returns false if no such body is live.
    pub fn remove(&mut self, id: CoinId) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.id != id);
        self.bodies.len() != before
    }

    /// Drop all dynamic bodies, keeping the boundary
    pub fn clear_bodies(&mut self) {
        self.bodies.clear();
    }

    /// Live bodies in creation order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Fastest linear speed among live bodies; zero for an empty world
    pub fn max_speed(&self) -> f32 {
        self.bodies
            .iter()
            .map(|b| b.vel.length())
            .fold(0.0, f32::max)
    }

    /// Advance the world by one fixed timestep
    pub fn step(&mut self, dt: f32) {
        // Integrate
        for body in &mut self.bodies {
            body.vel += self.gravity * dt;
            body.pos += body.vel * dt;
            body.angle += body.angular_vel * dt;
            body.angular_vel *= ANGULAR_DAMPING;
        }

        // Relax contacts
        for _ in 0..SOLVER_ITERATIONS {
            // Coin vs coin
            for i in 0..self.bodies.len() {
                let (head, tail) = self.bodies.split_at_mut(i + 1);
                let a = &mut head[i];
                for b in tail {
                    if let Some(contact) = circle_circle_contact(a.pos, a.radius, b.pos, b.radius)
                    {
                        resolve_pair_contact(a, b, &contact);
                    }
                }
            }

            // Coin vs vessel
            for body in &mut self.bodies {
                for seg in &self.statics {
                    if let Some(contact) = circle_segment_contact(body.pos, body.radius, seg) {
                        resolve_static_contact(body, &contact, self.static_friction);
                    }
                }
            }
        }
    }
}
