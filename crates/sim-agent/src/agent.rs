use serde::{Deserialize, Serialize};
use sim_claims::ClaimGroup;
use sim_core::Id;
use sim_nav::Navigator;
use sim_needs::Needs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    Staff,
}

impl Role {
    pub fn claim_group(self) -> ClaimGroup {
        match self {
            Role::Guest => ClaimGroup::Guest,
            Role::Staff => ClaimGroup::Staff,
        }
    }
}

/// The physical side of an agent, owned by the world so behaviors can reach it while their own
/// tree is being ticked.
#[derive(Debug, Clone)]
pub struct AgentBody {
    pub id: Id,
    pub role: Role,
    pub nav: Navigator,
    pub needs: Needs,
    /// Objects carried, in pick-up order.
    pub held: Vec<Id>,
    pub checked_in: bool,
    pub check_in_given_up: bool,
    pub stay_ticks: u64,
    /// Reached an exit; despawned at the end of the tick.
    pub left: bool,
}

impl AgentBody {
    pub fn is_holding(&self, object: Id) -> bool {
        self.held.contains(&object)
    }
}
