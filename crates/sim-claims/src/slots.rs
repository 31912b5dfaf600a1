use core::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClaimSlots<A> {
    slots: Vec<Option<A>>,
}

impl<A> ClaimSlots<A>
where
    A: Copy + Eq + Debug,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Take the lowest free slot for `agent`. An agent that already holds a slot gets its slot
    /// back; `None` means every slot is taken.
    pub fn try_occupy(&mut self, agent: A) -> Option<usize> {
        if let Some(index) = self.occupied_index(agent) {
            return Some(index);
        }
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(agent);
        tracing::trace!(?agent, index, "claim slot occupied");
        Some(index)
    }

    pub fn occupied_index(&self, agent: A) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(agent))
    }

    pub fn is_held_by(&self, agent: A) -> bool {
        self.occupied_index(agent).is_some()
    }

    /// Free the slot `agent` holds. Returns `false` when it holds none.
    pub fn try_release(&mut self, agent: A) -> bool {
        let Some(index) = self.occupied_index(agent) else {
            return false;
        };
        self.slots[index] = None;
        tracing::trace!(?agent, index, "claim slot released");
        true
    }

    pub fn holder(&self, index: usize) -> Option<A> {
        self.slots.get(index).copied().flatten()
    }

    /// Current holders in slot order.
    pub fn holders(&self) -> impl Iterator<Item = A> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn has_free(&self) -> bool {
        self.slots.iter().any(Option::is_none)
    }

    /// Empty every slot, returning the agents that held one.
    pub fn clear(&mut self) -> Vec<A> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }
}
