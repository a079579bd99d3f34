//! Deterministic pile simulation
//!
//! Everything that moves lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by creation order)
//! - No rendering or platform dependencies

pub mod body;
pub mod boundary;
pub mod collision;
pub mod engine;
pub mod reconcile;
pub mod snapshot;
pub mod stability;
pub mod world;

pub use body::{Body, CoinId, Segment};
pub use boundary::build_boundary;
pub use engine::{Coin, Engine, LoopState};
pub use reconcile::{Action, ReconcilePlan};
pub use snapshot::{CoinRenderState, Snapshot};
pub use stability::StabilityDetector;
pub use world::World;
