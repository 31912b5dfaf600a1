use serde::Serialize;
use sim_core::Id;
use sim_nav::{Direction, GridIndex, Vec2};

use crate::agent::Role;

/// Read-only view of one agent, for hosts and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub id: Id,
    pub role: Role,
    pub tile: GridIndex,
    /// Continuous position in tile units.
    pub position: Vec2,
    pub facing: Direction,
    pub happiness: f32,
    /// Rolling mean of recent happiness penalties.
    pub neediness: f32,
    pub needs: Vec<(String, i32)>,
    pub active_behavior: Option<String>,
    pub behavior_depth: usize,
    pub held: Vec<Id>,
    pub checked_in: bool,
}

impl AgentSnapshot {
    pub fn need(&self, name: &str) -> Option<i32> {
        self.needs
            .iter()
            .find(|(need, _)| need == name)
            .map(|(_, value)| *value)
    }
}
