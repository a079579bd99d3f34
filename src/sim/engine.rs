//! Simulation engine
//!
//! One `Engine` per visible pile widget. It owns the physics world, the coin
//! metadata, the staggered-insertion queue, and the stepping state machine;
//! nothing here is shared or global, so tearing a widget down is just
//! dropping its engine. A dropped engine takes its pending insertions with
//! it, which is what makes the "late timer touches a dead engine" race
//! structurally impossible.
//!
//! The host drives the engine from its frame clock: call `tick()` once per
//! frame while `is_active()`, redraw from the returned snapshot, and stop
//! scheduling frames once the loop suspends.

use std::collections::VecDeque;

use glam::Vec2;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::EngineConfig;
use crate::variant::{CoinVariant, sample_variant_or};

use super::body::{Body, CoinId};
use super::boundary::build_boundary;
use super::reconcile::{self, Action};
use super::snapshot::{Snapshot, project};
use super::stability::StabilityDetector;
use super::world::World;

/// Initial tilt range for a freshly spawned coin (radians)
const SPAWN_TILT: f32 = 0.3;

/// Stepping state of the integrator loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No active stepping; the last published snapshot stays valid
    Idle,
    /// Integrating every frame until the detector reports rest or the frame
    /// ceiling is hit
    Stepping,
}

/// Presentation metadata for one live coin, parallel to the world's body set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coin {
    pub id: CoinId,
    pub variant: CoinVariant,
}

/// A scheduled staggered insertion, due at an engine clock tick
#[derive(Debug, Clone, Copy)]
struct PendingAdd {
    due_tick: u64,
}

/// One self-contained pile simulation
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    world: World,
    /// Live coins in creation order, parallel to `world.bodies()`
    coins: Vec<Coin>,
    /// Staggered insertions not yet fired, ordered by due tick
    pending: VecDeque<PendingAdd>,
    rng: Pcg32,
    state: LoopState,
    detector: StabilityDetector,
    /// Ticks since construction; only advances while stepping
    clock_ticks: u64,
    /// Frames since the pile was last disturbed
    frames_since_wake: u32,
    next_id: u32,
    snapshot: Snapshot,
}

impl Engine {
    /// Build an engine: boundary geometry is created here, exactly once
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        let statics = build_boundary(&config);
        let world = World::new(
            Vec2::new(0.0, -config.gravity),
            config.static_friction,
            statics,
        );
        let detector = StabilityDetector::new(
            config.warmup_frames,
            config.speed_threshold,
            config.stable_frames,
        );
        info!(
            "engine created: vessel radius {}, max {} coins, seed {}",
            config.vessel_radius, config.max_coins, seed
        );
        Self {
            config,
            world,
            coins: Vec::new(),
            pending: VecDeque::new(),
            rng: Pcg32::seed_from_u64(seed),
            state: LoopState::Idle,
            detector,
            clock_ticks: 0,
            frames_since_wake: 0,
            next_id: 1,
            snapshot: Snapshot::default(),
        }
    }

    /// Reconcile the live coin set against a new target count.
    ///
    /// Targets above the supported maximum saturate. This is the only
    /// operation that changes the coin count.
    pub fn set_target(&mut self, target: usize) {
        let plan = reconcile::plan(
            target,
            self.coins.len(),
            self.pending.len(),
            self.config.max_coins,
        );
        debug!(
            "reconcile: target {} live {} pending {} -> {:?}",
            target,
            self.coins.len(),
            self.pending.len(),
            plan
        );
        if plan.is_noop() {
            return;
        }

        // Newest scheduled insertions are the ones a lower target supersedes
        for _ in 0..plan.cancel_pending {
            self.pending.pop_back();
        }

        match plan.action {
            Action::Noop => {}
            Action::BulkSeed(n) => {
                // Stack the batch vertically so coins don't overlap at birth
                for i in 0..n {
                    self.spawn_coin(None, i);
                }
            }
            Action::Stagger(n) => {
                let interval = self.config.stagger_ticks();
                let mut due = self
                    .pending
                    .back()
                    .map_or(self.clock_ticks, |p| p.due_tick);
                for _ in 0..n {
                    due += interval;
                    self.pending.push_back(PendingAdd { due_tick: due });
                }
            }
            Action::Remove(k) => self.remove_newest(k),
        }

        if plan.wakes_loop() {
            self.wake();
        }
    }

    /// Advance one fixed timestep. Returns the freshly published snapshot,
    /// or `None` when the loop is idle and the host should stop scheduling
    /// frames.
    pub fn tick(&mut self) -> Option<&Snapshot> {
        if self.state != LoopState::Stepping {
            return None;
        }

        self.clock_ticks += 1;
        self.frames_since_wake += 1;

        // Fire due staggered insertions; each one disturbs the pile
        let mut fired = 0usize;
        while self
            .pending
            .front()
            .is_some_and(|p| p.due_tick <= self.clock_ticks)
        {
            self.pending.pop_front();
            self.spawn_coin(None, 0);
            fired += 1;
        }
        if fired > 0 {
            debug!("fired {} staggered insertion(s)", fired);
            self.detector.reset();
            self.frames_since_wake = 0;
        }

        self.world.step(self.config.dt);
        self.snapshot = project(self.world.bodies(), &self.coins, &self.config);

        let stable = self.detector.observe(self.world.max_speed());
        let ceiling = self.frames_since_wake >= self.config.frame_ceiling;
        // The loop may not suspend while insertions are still queued
        if self.pending.is_empty() && (stable || ceiling) {
            if stable {
                info!("pile at rest after {} frames", self.frames_since_wake);
            } else {
                info!(
                    "frame ceiling ({}) hit, forcing idle",
                    self.config.frame_ceiling
                );
            }
            self.state = LoopState::Idle;
        }

        Some(&self.snapshot)
    }

    /// Remove every coin and cancel every pending insertion, keeping the
    /// boundary. Used by hosts that reset a widget to zero and rebuild.
    pub fn clear(&mut self) {
        debug!(
            "clearing engine: {} live, {} pending",
            self.coins.len(),
            self.pending.len()
        );
        self.pending.clear();
        self.coins.clear();
        self.world.clear_bodies();
        self.snapshot = Snapshot::default();
        self.detector.reset();
        self.state = LoopState::Idle;
    }

    /// Last published snapshot; stays valid while the loop idles
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn live_count(&self) -> usize {
        self.coins.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn loop_state(&self) -> LoopState {
        self.state
    }

    /// Whether the host should keep scheduling frame callbacks
    pub fn is_active(&self) -> bool {
        self.state == LoopState::Stepping
    }

    /// Live coins in creation order
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn wake(&mut self) {
        self.state = LoopState::Stepping;
        self.frames_since_wake = 0;
        self.detector.reset();
    }

    /// Create one coin above the vessel. `stack_index` lifts bulk-seeded
    /// coins so a batch doesn't spawn perfectly overlapping.
    fn spawn_coin(&mut self, forced: Option<CoinVariant>, stack_index: usize) {
        let id = CoinId(self.next_id);
        self.next_id += 1;

        let variant = sample_variant_or(forced, &mut self.rng);
        let jitter = self.config.spawn_jitter_frac * self.config.coin_diameter;
        let x = self.rng.random_range(-jitter..jitter);
        let y = self.config.spawn_height() + stack_index as f32 * self.config.spawn_spacing();

        let body = Body {
            id,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            angle: self.rng.random_range(-SPAWN_TILT..SPAWN_TILT),
            angular_vel: self
                .rng
                .random_range(-self.config.initial_spin..self.config.initial_spin),
            radius: self.config.collision_radius(),
            inv_mass: 1.0 / self.config.coin_mass(),
            friction: self.config.friction,
            restitution: self.config.restitution,
        };
        self.world.spawn(body);
        self.coins.push(Coin { id, variant });
        debug!("spawned coin {:?} ({})", id, variant.as_str());
    }

    /// Drop the `k` most recently created coins, preserving the settled
    /// bottom of the pile
    fn remove_newest(&mut self, k: usize) {
        for _ in 0..k {
            if let Some(coin) = self.coins.pop() {
                self.world.remove(coin.id);
                debug!("removed coin {:?}", coin.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default(), 42)
    }

    /// Tick until the loop suspends, returning the frame count
    fn run_to_rest(engine: &mut Engine) -> u32 {
        let mut frames = 0;
        while engine.is_active() {
            engine.tick();
            frames += 1;
            assert!(frames < 5000, "loop failed to suspend");
        }
        frames
    }

    #[test]
    fn test_pour_in_scenario() {
        let mut eng = engine();
        assert_eq!(eng.loop_state(), LoopState::Idle);

        eng.set_target(5);
        // Fresh engine bulk-seeds synchronously, no staggering
        assert_eq!(eng.live_count(), 5);
        assert_eq!(eng.pending_count(), 0);
        assert_eq!(eng.loop_state(), LoopState::Stepping);

        // Everything spawned above the visible vessel
        let cfg = eng.config().clone();
        eng.tick();
        for coin in &eng.snapshot().coins {
            assert!(coin.position.y > cfg.vessel_radius);
        }

        run_to_rest(&mut eng);
        assert_eq!(eng.loop_state(), LoopState::Idle);
        assert_eq!(eng.live_count(), 5);
    }

    #[test]
    fn test_single_increment_scenario() {
        let mut eng = engine();
        eng.set_target(5);
        run_to_rest(&mut eng);

        eng.set_target(6);
        // Exactly one staggered insertion, loop re-awake
        assert_eq!(eng.pending_count(), 1);
        assert_eq!(eng.live_count(), 5);
        assert!(eng.is_active());

        // The insertion fires after the stagger interval
        for _ in 0..eng.config().stagger_ticks() {
            eng.tick();
        }
        assert_eq!(eng.live_count(), 6);
        assert_eq!(eng.pending_count(), 0);

        run_to_rest(&mut eng);
        assert_eq!(eng.live_count(), 6);
    }

    #[test]
    fn test_decrement_scenario_lifo_without_stepping() {
        let mut eng = engine();
        eng.set_target(6);
        run_to_rest(&mut eng);
        let ids: Vec<_> = eng.coins().iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=6).map(CoinId).collect::<Vec<_>>());

        eng.set_target(4);
        // Removal is immediate; no tick needed
        assert_eq!(eng.live_count(), 4);
        let remaining: Vec<_> = eng.coins().iter().map(|c| c.id).collect();
        assert_eq!(remaining, (1..=4).map(CoinId).collect::<Vec<_>>());
        // But the survivors get to resettle
        assert!(eng.is_active());
    }

    #[test]
    fn test_idempotent_reconcile() {
        let mut eng = engine();
        eng.set_target(5);
        run_to_rest(&mut eng);

        let before: Vec<_> = eng.coins().to_vec();
        eng.set_target(5);
        assert_eq!(eng.loop_state(), LoopState::Idle);
        assert_eq!(eng.pending_count(), 0);
        assert_eq!(eng.coins(), &before[..]);
    }

    #[test]
    fn test_teardown_during_stagger() {
        let mut eng = engine();
        eng.set_target(5);
        run_to_rest(&mut eng);

        eng.set_target(8);
        assert_eq!(eng.pending_count(), 3);

        eng.clear();
        assert_eq!(eng.live_count(), 0);
        assert_eq!(eng.pending_count(), 0);
        assert_eq!(eng.loop_state(), LoopState::Idle);
        assert!(eng.snapshot().coins.is_empty());
        // Nothing left to fire
        assert!(eng.tick().is_none());
    }

    #[test]
    fn test_drop_right_after_bulk_seed() {
        let mut eng = engine();
        eng.set_target(3);
        assert_eq!(eng.live_count(), 3);
        // Ownership takes pending work down with the engine
        drop(eng);
    }

    #[test]
    fn test_superseded_pending_adds_are_cancelled() {
        let mut eng = engine();
        eng.set_target(5);
        run_to_rest(&mut eng);

        eng.set_target(9);
        assert_eq!(eng.pending_count(), 4);

        // Drop the target before any insertion fires: three of the four
        // pending adds are superseded and cancelled, no live coin is touched
        eng.set_target(6);
        assert_eq!(eng.pending_count(), 1);
        assert_eq!(eng.live_count(), 5);

        run_to_rest(&mut eng);
        assert_eq!(eng.live_count(), 6);
    }

    #[test]
    fn test_stability_termination_within_ceiling() {
        for target in [1usize, 7, 40] {
            let mut eng = engine();
            eng.set_target(target);
            let frames = run_to_rest(&mut eng);
            assert!(
                frames <= eng.config().frame_ceiling,
                "target {} took {} frames",
                target,
                frames
            );
        }
    }

    #[test]
    fn test_rotation_bound_holds_for_entire_run() {
        let mut eng = engine();
        let max_tilt = eng.config().max_tilt_degrees;
        eng.set_target(10);
        while eng.is_active() {
            let snap = eng.tick().unwrap();
            for coin in &snap.coins {
                assert!(coin.rotation_degrees.abs() <= max_tilt + 1e-3);
            }
        }
    }

    #[test]
    fn test_settled_pile_stays_inside_vessel() {
        let mut eng = engine();
        eng.set_target(12);
        run_to_rest(&mut eng);

        let cfg = eng.config();
        let limit = cfg.boundary_radius() + cfg.coin_radius();
        for coin in &eng.snapshot().coins {
            assert!(
                coin.position.length() <= limit,
                "coin escaped to {:?}",
                coin.position
            );
        }
    }

    #[test]
    fn test_snapshot_persists_while_idle() {
        let mut eng = engine();
        eng.set_target(4);
        run_to_rest(&mut eng);

        assert_eq!(eng.snapshot().coins.len(), 4);
        // Idle ticks publish nothing and leave the snapshot untouched
        let before = eng.snapshot().clone();
        assert!(eng.tick().is_none());
        assert_eq!(eng.snapshot(), &before);
    }

    #[test]
    fn test_determinism_per_seed() {
        let mut a = Engine::new(EngineConfig::default(), 7);
        let mut b = Engine::new(EngineConfig::default(), 7);

        a.set_target(8);
        b.set_target(8);
        for _ in 0..120 {
            let sa = a.tick().cloned();
            let sb = b.tick().cloned();
            assert_eq!(sa, sb);
        }
        assert_eq!(a.live_count(), b.live_count());
    }

    #[test]
    fn test_forced_variant_hook() {
        let mut eng = engine();
        eng.spawn_coin(Some(CoinVariant::EdgeOn), 0);
        assert_eq!(eng.coins()[0].variant, CoinVariant::EdgeOn);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        // Live count after a fresh reconciliation saturates at max_coins
        #[test]
        fn prop_fresh_target_saturates(target in 0usize..200) {
            let mut eng = engine();
            eng.set_target(target);
            prop_assert_eq!(
                eng.live_count(),
                target.min(eng.config().max_coins)
            );
        }

        // Decreasing from n to n-k removes exactly the k newest coins
        #[test]
        fn prop_lifo_removal(n in 1usize..=40, k in 0usize..=40) {
            let k = k.min(n);
            let mut eng = engine();
            eng.set_target(n);
            let original: Vec<_> = eng.coins().iter().map(|c| c.id).collect();

            eng.set_target(n - k);
            let remaining: Vec<_> = eng.coins().iter().map(|c| c.id).collect();
            prop_assert_eq!(&remaining[..], &original[..n - k]);
        }
    }
}
