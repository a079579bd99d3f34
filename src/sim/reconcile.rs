//! Target-count reconciliation
//!
//! Pure planning: given the requested count, the live count, and how many
//! staggered insertions are still pending, decide what the engine should do.
//! This is the only place coin counts change, and it runs strictly serially
//! per engine.
//!
//! Rules:
//! - targets saturate at the configured maximum, they never error;
//! - a fresh engine going 0 → n bulk-seeds all n coins at once;
//! - an increase on a non-fresh engine staggers the delta in one at a time;
//! - a decrease removes the newest coins first (LIFO), and cancels pending
//!   insertions it supersedes before touching live coins;
//! - an unchanged target is a no-op.

/// What the engine should do to the coin set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Noop,
    /// Create this many coins immediately (fresh-engine pour-in)
    BulkSeed(usize),
    /// Schedule this many coins at the stagger interval
    Stagger(usize),
    /// Remove this many live coins, newest first
    Remove(usize),
}

/// A reconciliation plan: pending insertions to cancel, then one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Pending staggered insertions superseded by this target
    pub cancel_pending: usize,
    pub action: Action,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.cancel_pending == 0 && self.action == Action::Noop
    }

    /// Whether the plan disturbs the pile and the loop must wake
    pub fn wakes_loop(&self) -> bool {
        !matches!(self.action, Action::Noop)
    }
}

/// Plan the minimal add/remove set for a new target count.
///
/// `pending` counts staggered insertions not yet fired; they are part of the
/// committed total a new target is diffed against.
pub fn plan(target: usize, live: usize, pending: usize, max_coins: usize) -> ReconcilePlan {
    let target = target.min(max_coins);
    let committed = live + pending;

    if target >= committed {
        let delta = target - committed;
        let action = if delta == 0 {
            Action::Noop
        } else if committed == 0 {
            Action::BulkSeed(delta)
        } else {
            Action::Stagger(delta)
        };
        ReconcilePlan {
            cancel_pending: 0,
            action,
        }
    } else {
        let overshoot = committed - target;
        let cancel_pending = overshoot.min(pending);
        let remove = overshoot - cancel_pending;
        let action = if remove == 0 {
            Action::Noop
        } else {
            Action::Remove(remove)
        };
        ReconcilePlan {
            cancel_pending,
            action,
        }
    }
}
