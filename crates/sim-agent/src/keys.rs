//! Blackboard keys used by behavior instances.
//!
//! Every running instance owns one blackboard namespace; its keys are dropped together when the
//! instance is released. Leaves find their instance through [`ACTIVE_SCOPE`], which the instance
//! sets before each tick.

use sim_core::{BbKey, Blackboard, Id};
use sim_nav::GridIndex;

use crate::catalog::BehaviorId;

/// Namespace of the instance currently being ticked.
pub const ACTIVE_SCOPE: BbKey<u16> = BbKey::scoped(0, 1);

const FIRST_SCOPE: u16 = 1;
// 0xFFFF belongs to the tracing keys.
const LAST_SCOPE: u16 = 0xFFFE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scope(u16);

impl Scope {
    pub const fn new(namespace: u16) -> Self {
        Self(namespace)
    }

    pub fn namespace(self) -> u16 {
        self.0
    }

    /// Panics outside a behavior instance tick.
    pub fn current(blackboard: &Blackboard) -> Self {
        Self(*blackboard.require(ACTIVE_SCOPE))
    }

    pub fn active(blackboard: &Blackboard) -> Option<Self> {
        blackboard.get(ACTIVE_SCOPE).copied().map(Self)
    }

    /// Successor in the namespace cycle.
    pub fn next(self) -> Self {
        if self.0 >= LAST_SCOPE || self.0 < FIRST_SCOPE {
            Self(FIRST_SCOPE)
        } else {
            Self(self.0 + 1)
        }
    }

    /// Object the behavior was started on.
    pub const fn target(self) -> BbKey<Option<Id>> {
        BbKey::scoped(self.0, 1)
    }

    pub const fn behavior(self) -> BbKey<BehaviorId> {
        BbKey::scoped(self.0, 2)
    }

    /// Where the next move step heads.
    pub const fn goal(self) -> BbKey<GridIndex> {
        BbKey::scoped(self.0, 3)
    }

    /// Rack the target was taken from.
    pub const fn rack(self) -> BbKey<Option<Id>> {
        BbKey::scoped(self.0, 4)
    }

    /// Objects picked up by this instance and not yet put down.
    pub const fn held(self) -> BbKey<Vec<Id>> {
        BbKey::scoped(self.0, 5)
    }

    /// Object whose claim slot this instance holds.
    pub const fn claimed(self) -> BbKey<Id> {
        BbKey::scoped(self.0, 6)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self(FIRST_SCOPE)
    }
}
