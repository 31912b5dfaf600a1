use std::borrow::Cow;

use sim_core::{Blackboard, TickContext, WorldMut};
use sim_tools::{emit as trace_emit, TraceEvent};

use crate::bt::{BtNode, BtStatus, Exit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Not active; the next tick starts a new activation.
    Waiting,
    Running,
}

/// Lifecycle wrapper shared by every node kind.
pub struct Node<W>
where
    W: WorldMut + 'static,
{
    label: Cow<'static, str>,
    state: NodeState,
    behavior: Box<dyn BtNode<W>>,
}

impl<W> Node<W>
where
    W: WorldMut + 'static,
{
    pub fn new(label: impl Into<Cow<'static, str>>, behavior: impl BtNode<W>) -> Self {
        Self::boxed(label, Box::new(behavior))
    }

    pub fn boxed(label: impl Into<Cow<'static, str>>, behavior: Box<dyn BtNode<W>>) -> Self {
        Self {
            label: label.into(),
            state: NodeState::Waiting,
            behavior,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == NodeState::Running
    }

    pub fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        if self.state == NodeState::Waiting {
            self.state = NodeState::Running;
            tracing::trace!(node = %self.label, tick = ctx.tick, "bt node initialize");
            trace_emit(
                blackboard,
                TraceEvent::new(ctx.tick, "bt.node.init").with_label(self.label.clone()),
            );
            self.behavior.initialize(ctx, agent, world, blackboard);
        }

        let status = self.behavior.update(ctx, agent, world, blackboard);
        if let Some(exit) = status.exit() {
            self.finish(ctx, agent, world, blackboard, exit);
        }
        status
    }

    /// Abort this node and, depth-first, all of its active children.
    ///
    /// Idempotent: a node that is not running ignores the request.
    pub fn request_terminate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        if self.state != NodeState::Running {
            return;
        }
        self.behavior.abort_children(ctx, agent, world, blackboard);
        self.finish(ctx, agent, world, blackboard, Exit::Aborted);
    }

    fn finish(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
        exit: Exit,
    ) {
        self.state = NodeState::Waiting;
        tracing::trace!(node = %self.label, tick = ctx.tick, ?exit, "bt node terminate");
        self.behavior.terminate(ctx, agent, world, blackboard, exit);
        trace_emit(
            blackboard,
            TraceEvent::new(ctx.tick, "bt.node.exit")
                .with_label(self.label.clone())
                .with_a(exit.code()),
        );
    }
}
