use crate::{Blackboard, TickContext, WorldMut};

/// Result of ticking an action primitive once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Success,
    /// Multi-tick work in progress; tick again next step.
    Waiting,
    Failed,
}

impl ActionStatus {
    pub fn is_done(self) -> bool {
        !matches!(self, ActionStatus::Waiting)
    }
}

/// A small, restartable unit of work.
///
/// Actions never block: long-running work reports `Waiting` and is resumed on the next tick.
/// `cancel` is called when the owner stops ticking the action before it finished.
pub trait Action<W>: 'static
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus;

    fn cancel(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) {
    }
}
