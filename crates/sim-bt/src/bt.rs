use sim_core::{ActionStatus, Blackboard, TickContext, WorldMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtStatus {
    Running,
    Success,
    Failure,
}

impl BtStatus {
    /// `None` while the node keeps running.
    pub fn exit(self) -> Option<Exit> {
        match self {
            BtStatus::Running => None,
            BtStatus::Success => Some(Exit::Success),
            BtStatus::Failure => Some(Exit::Failure),
        }
    }

    pub fn invert(self) -> Self {
        match self {
            BtStatus::Running => BtStatus::Running,
            BtStatus::Success => BtStatus::Failure,
            BtStatus::Failure => BtStatus::Success,
        }
    }
}

impl From<ActionStatus> for BtStatus {
    fn from(value: ActionStatus) -> Self {
        match value {
            ActionStatus::Success => BtStatus::Success,
            ActionStatus::Waiting => BtStatus::Running,
            ActionStatus::Failed => BtStatus::Failure,
        }
    }
}

/// Why a node left the running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
    /// Forced termination from a parent or owner.
    Aborted,
}

impl Exit {
    pub fn code(self) -> u64 {
        match self {
            Exit::Success => 0,
            Exit::Failure => 1,
            Exit::Aborted => 2,
        }
    }
}

/// The per-kind behavior of a node. The lifecycle itself lives in [`crate::Node`].
pub trait BtNode<W>: 'static
where
    W: WorldMut + 'static,
{
    fn initialize(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) {
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus;

    fn terminate(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
        _exit: Exit,
    ) {
    }

    /// Forward a termination request to every active child. Containers only.
    fn abort_children(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) {
    }
}
