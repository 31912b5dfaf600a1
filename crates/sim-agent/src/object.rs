use serde::{Deserialize, Serialize};
use sim_claims::ClaimPools;
use sim_core::Id;
use sim_nav::{Direction, GridIndex};

use crate::catalog::BehaviorId;

/// Placement request for a world object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub name: String,
    pub tile: GridIndex,
    /// Where agents stand to use the object; defaults to `tile`.
    #[serde(default)]
    pub interaction: Option<GridIndex>,
    /// Non-walkable objects block their tile for pathfinding.
    #[serde(default)]
    pub walkable: bool,
    #[serde(default)]
    pub guest_slots: usize,
    #[serde(default)]
    pub staff_slots: usize,
    /// Behavior names this object advertises.
    #[serde(default)]
    pub behaviors: Vec<String>,
    /// Remaining stock for dispensers.
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl ObjectSpec {
    pub fn new(name: impl Into<String>, tile: GridIndex) -> Self {
        Self {
            name: name.into(),
            tile,
            interaction: None,
            walkable: false,
            guest_slots: 0,
            staff_slots: 0,
            behaviors: Vec::new(),
            quantity: None,
        }
    }

    pub fn interaction(mut self, at: GridIndex) -> Self {
        self.interaction = Some(at);
        self
    }

    pub fn walkable(mut self) -> Self {
        self.walkable = true;
        self
    }

    pub fn slots(mut self, guest: usize, staff: usize) -> Self {
        self.guest_slots = guest;
        self.staff_slots = staff;
        self
    }

    pub fn behavior(mut self, name: impl Into<String>) -> Self {
        self.behaviors.push(name.into());
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

#[derive(Debug, Clone)]
pub struct WorldObject {
    pub id: Id,
    pub name: String,
    pub tile: GridIndex,
    pub interaction: GridIndex,
    pub walkable: bool,
    pub facing: Direction,
    pub claims: ClaimPools<Id>,
    pub behaviors: Vec<BehaviorId>,
    /// Rack this object is stored on.
    pub parent: Option<Id>,
    /// Objects racked on this one.
    pub racked: Vec<Id>,
    /// Agent carrying this object.
    pub holder: Option<Id>,
    pub quantity: Option<u32>,
}

impl WorldObject {
    pub fn is_racked(&self) -> bool {
        self.parent.is_some()
    }

    pub fn is_held(&self) -> bool {
        self.holder.is_some()
    }
}
