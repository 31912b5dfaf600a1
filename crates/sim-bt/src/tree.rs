use sim_core::{Blackboard, TickContext, WorldMut};

use crate::bt::BtStatus;
use crate::node::Node;

/// An instantiated tree bound to one agent: the root node plus its last reported status.
pub struct BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    label: String,
    root: Node<W>,
    last: BtStatus,
}

impl<W> BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    pub fn new(label: impl Into<String>, root: Node<W>) -> Self {
        Self {
            label: label.into(),
            root,
            last: BtStatus::Running,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn last_status(&self) -> BtStatus {
        self.last
    }

    pub fn is_running(&self) -> bool {
        self.root.is_running()
    }

    pub fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        self.last = self.root.tick(ctx, agent, world, blackboard);
        self.last
    }

    pub fn request_terminate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        self.root.request_terminate(ctx, agent, world, blackboard);
    }
}
