use std::rc::Rc;

use sim_core::{Blackboard, TickContext, WorldMut};

use crate::bt::{BtNode, BtStatus, Exit};
use crate::node::Node;

/// Flips Success/Failure; Running passes through.
pub struct Inverter<W>
where
    W: WorldMut + 'static,
{
    child: Node<W>,
}

impl<W> Inverter<W>
where
    W: WorldMut + 'static,
{
    pub fn new(child: Node<W>) -> Self {
        Self { child }
    }
}

impl<W> BtNode<W> for Inverter<W>
where
    W: WorldMut + 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        self.child.tick(ctx, agent, world, blackboard).invert()
    }

    fn abort_children(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        self.child.request_terminate(ctx, agent, world, blackboard);
    }
}

/// Restarts the child after each success until it has succeeded `count` times; the first failure
/// aborts the loop.
pub struct Repeat<W>
where
    W: WorldMut + 'static,
{
    child: Node<W>,
    count: u32,
    completed: u32,
}

impl<W> Repeat<W>
where
    W: WorldMut + 'static,
{
    pub fn new(count: u32, child: Node<W>) -> Self {
        Self {
            child,
            count,
            completed: 0,
        }
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }
}

impl<W> BtNode<W> for Repeat<W>
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
        self.completed = 0;
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        match self.child.tick(ctx, agent, world, blackboard) {
            BtStatus::Running => BtStatus::Running,
            BtStatus::Failure => BtStatus::Failure,
            BtStatus::Success => {
                self.completed += 1;
                if self.completed >= self.count {
                    BtStatus::Success
                } else {
                    BtStatus::Running
                }
            }
        }
    }

    fn abort_children(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        self.child.request_terminate(ctx, agent, world, blackboard);
    }
}

/// Re-attempts a failing child up to `attempts` times in total; success passes through at once.
pub struct Retry<W>
where
    W: WorldMut + 'static,
{
    child: Node<W>,
    attempts: u32,
    failures: u32,
}

impl<W> Retry<W>
where
    W: WorldMut + 'static,
{
    pub fn new(attempts: u32, child: Node<W>) -> Self {
        Self {
            child,
            attempts,
            failures: 0,
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl<W> BtNode<W> for Retry<W>
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
        self.failures = 0;
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        match self.child.tick(ctx, agent, world, blackboard) {
            BtStatus::Running => BtStatus::Running,
            BtStatus::Success => BtStatus::Success,
            BtStatus::Failure => {
                self.failures += 1;
                if self.failures >= self.attempts {
                    BtStatus::Failure
                } else {
                    BtStatus::Running
                }
            }
        }
    }

    fn abort_children(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        self.child.request_terminate(ctx, agent, world, blackboard);
    }
}

/// Embeds an independently built tree as one node.
///
/// The tree is built on activation and dropped on termination, so each activation starts from a
/// fresh graph.
pub struct SubTree<W>
where
    W: WorldMut + 'static,
{
    build: Rc<dyn Fn() -> Node<W>>,
    tree: Option<Node<W>>,
}

impl<W> SubTree<W>
where
    W: WorldMut + 'static,
{
    pub fn new(build: impl Fn() -> Node<W> + 'static) -> Self {
        Self::shared(Rc::new(build))
    }

    pub fn shared(build: Rc<dyn Fn() -> Node<W>>) -> Self {
        Self { build, tree: None }
    }

    pub fn is_built(&self) -> bool {
        self.tree.is_some()
    }
}

impl<W> BtNode<W> for SubTree<W>
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
        self.tree = Some((self.build)());
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        match self.tree.as_mut() {
            Some(tree) => tree.tick(ctx, agent, world, blackboard),
            None => BtStatus::Failure,
        }
    }

    fn terminate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
        _exit: Exit,
    ) {
        if let Some(mut tree) = self.tree.take() {
            tree.request_terminate(ctx, agent, world, blackboard);
        }
    }

    fn abort_children(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        if let Some(tree) = self.tree.as_mut() {
            tree.request_terminate(ctx, agent, world, blackboard);
        }
    }
}
