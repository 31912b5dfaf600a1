use core::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ClaimSlots;

/// Which slot array an agent competes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClaimGroup {
    Guest,
    Staff,
}

/// Independent guest and staff slot arrays on one object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClaimPools<A> {
    guest: ClaimSlots<A>,
    staff: ClaimSlots<A>,
}

impl<A> Default for ClaimPools<A>
where
    A: Copy + Eq + Debug,
{
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl<A> ClaimPools<A>
where
    A: Copy + Eq + Debug,
{
    pub fn new(guest: usize, staff: usize) -> Self {
        Self {
            guest: ClaimSlots::new(guest),
            staff: ClaimSlots::new(staff),
        }
    }

    pub fn slots(&self, group: ClaimGroup) -> &ClaimSlots<A> {
        match group {
            ClaimGroup::Guest => &self.guest,
            ClaimGroup::Staff => &self.staff,
        }
    }

    pub fn slots_mut(&mut self, group: ClaimGroup) -> &mut ClaimSlots<A> {
        match group {
            ClaimGroup::Guest => &mut self.guest,
            ClaimGroup::Staff => &mut self.staff,
        }
    }

    pub fn try_occupy(&mut self, group: ClaimGroup, agent: A) -> Option<usize> {
        self.slots_mut(group).try_occupy(agent)
    }

    /// Release `agent` from whichever arrays it holds a slot in.
    pub fn release_all(&mut self, agent: A) -> bool {
        let guest = self.guest.try_release(agent);
        let staff = self.staff.try_release(agent);
        guest || staff
    }

    pub fn has_free(&self, group: ClaimGroup) -> bool {
        self.slots(group).has_free()
    }

    pub fn holds(&self, agent: A) -> bool {
        self.guest.is_held_by(agent) || self.staff.is_held_by(agent)
    }

    /// Every holder in either array; guests first.
    pub fn holders(&self) -> Vec<A> {
        self.guest.holders().chain(self.staff.holders()).collect()
    }

    pub fn clear(&mut self) -> Vec<A> {
        let mut out = self.guest.clear();
        out.extend(self.staff.clear());
        out
    }
}
