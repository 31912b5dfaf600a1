use sim_core::{Blackboard, TickContext, WorldMut};

use crate::bt::{BtNode, BtStatus, Exit};
use crate::node::Node;

fn abort_all<W>(
    children: &mut [Node<W>],
    ctx: &TickContext,
    agent: W::Agent,
    world: &mut W,
    blackboard: &mut Blackboard,
) where
    W: WorldMut + 'static,
{
    for child in children.iter_mut() {
        child.request_terminate(ctx, agent, world, blackboard);
    }
}

/// Runs children in order, one child per tick.
///
/// A child failure resets the cursor and fails the sequence; a child success advances the cursor.
/// The sequence succeeds on the tick its last child succeeds and reports `Running` in between.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Node<W>>,
    cursor: usize,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Node<W>>) -> Self {
        Self {
            children,
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<W> BtNode<W> for Sequence<W>
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
        self.cursor = 0;
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        let Some(child) = self.children.get_mut(self.cursor) else {
            return BtStatus::Success;
        };

        match child.tick(ctx, agent, world, blackboard) {
            BtStatus::Running => BtStatus::Running,
            BtStatus::Failure => {
                self.cursor = 0;
                BtStatus::Failure
            }
            BtStatus::Success => {
                self.cursor += 1;
                if self.cursor >= self.children.len() {
                    self.cursor = 0;
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
        abort_all(&mut self.children, ctx, agent, world, blackboard);
    }
}

/// Runs children in order, one child per tick, until one succeeds.
pub struct Selector<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Node<W>>,
    cursor: usize,
}

impl<W> Selector<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Node<W>>) -> Self {
        Self {
            children,
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<W> BtNode<W> for Selector<W>
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
        self.cursor = 0;
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        let Some(child) = self.children.get_mut(self.cursor) else {
            return BtStatus::Failure;
        };

        match child.tick(ctx, agent, world, blackboard) {
            BtStatus::Running => BtStatus::Running,
            BtStatus::Success => {
                self.cursor = 0;
                BtStatus::Success
            }
            BtStatus::Failure => {
                self.cursor += 1;
                if self.cursor >= self.children.len() {
                    self.cursor = 0;
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
        abort_all(&mut self.children, ctx, agent, world, blackboard);
    }
}

/// Barrier: ticks every unresolved child once per tick and succeeds once each child has reported
/// a terminal result, whatever that result was.
pub struct All<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Node<W>>,
    resolved: Vec<bool>,
}

impl<W> All<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Node<W>>) -> Self {
        let resolved = vec![false; children.len()];
        Self { children, resolved }
    }
}

impl<W> BtNode<W> for All<W>
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
        self.resolved.fill(false);
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        for (child, resolved) in self.children.iter_mut().zip(self.resolved.iter_mut()) {
            if *resolved {
                continue;
            }
            if child.tick(ctx, agent, world, blackboard) != BtStatus::Running {
                *resolved = true;
            }
        }

        if self.resolved.iter().all(|r| *r) {
            BtStatus::Success
        } else {
            BtStatus::Running
        }
    }

    fn abort_children(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        abort_all(&mut self.children, ctx, agent, world, blackboard);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallelPolicy {
    RequireOne,
    RequireAll,
}

/// Ticks every running child each tick and resolves against a success and a failure policy.
///
/// Failure is checked before success. If every child resolved without satisfying either policy
/// (e.g. mixed results under require-all/require-all) the node fails. Children still running at
/// resolution are terminated.
pub struct Parallel<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Node<W>>,
    success: ParallelPolicy,
    failure: ParallelPolicy,
    results: Vec<Option<BtStatus>>,
}

impl<W> Parallel<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Node<W>>, success: ParallelPolicy, failure: ParallelPolicy) -> Self {
        let results = vec![None; children.len()];
        Self {
            children,
            success,
            failure,
            results,
        }
    }
}

impl<W> BtNode<W> for Parallel<W>
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
        self.results.fill(None);
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        for (child, result) in self.children.iter_mut().zip(self.results.iter_mut()) {
            if result.is_some() {
                continue;
            }
            let status = child.tick(ctx, agent, world, blackboard);
            if status != BtStatus::Running {
                *result = Some(status);
            }
        }

        let total = self.children.len();
        let successes = self
            .results
            .iter()
            .filter(|r| **r == Some(BtStatus::Success))
            .count();
        let failures = self
            .results
            .iter()
            .filter(|r| **r == Some(BtStatus::Failure))
            .count();

        let failed = match self.failure {
            ParallelPolicy::RequireOne => failures > 0,
            ParallelPolicy::RequireAll => failures == total,
        };
        if failed {
            return BtStatus::Failure;
        }

        let succeeded = match self.success {
            ParallelPolicy::RequireOne => successes > 0,
            ParallelPolicy::RequireAll => successes == total,
        };
        if succeeded {
            return BtStatus::Success;
        }

        if successes + failures == total {
            return BtStatus::Failure;
        }
        BtStatus::Running
    }

    fn terminate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
        _exit: Exit,
    ) {
        abort_all(&mut self.children, ctx, agent, world, blackboard);
    }

    fn abort_children(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        abort_all(&mut self.children, ctx, agent, world, blackboard);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Condition,
    Then,
    Else,
}

/// Condition picks the branch that stays active for the following ticks.
///
/// Without an else branch a failed condition makes the whole node succeed: "nothing to do" is
/// not an error.
pub struct IfThenElse<W>
where
    W: WorldMut + 'static,
{
    condition: Node<W>,
    then: Node<W>,
    otherwise: Option<Node<W>>,
    active: Branch,
}

impl<W> IfThenElse<W>
where
    W: WorldMut + 'static,
{
    pub fn new(condition: Node<W>, then: Node<W>, otherwise: Option<Node<W>>) -> Self {
        Self {
            condition,
            then,
            otherwise,
            active: Branch::Condition,
        }
    }
}

impl<W> BtNode<W> for IfThenElse<W>
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
        self.active = Branch::Condition;
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        match self.active {
            Branch::Condition => match self.condition.tick(ctx, agent, world, blackboard) {
                BtStatus::Running => BtStatus::Running,
                BtStatus::Success => {
                    self.active = Branch::Then;
                    BtStatus::Running
                }
                BtStatus::Failure => {
                    if self.otherwise.is_some() {
                        self.active = Branch::Else;
                        BtStatus::Running
                    } else {
                        BtStatus::Success
                    }
                }
            },
            Branch::Then => self.then.tick(ctx, agent, world, blackboard),
            Branch::Else => match self.otherwise.as_mut() {
                Some(otherwise) => otherwise.tick(ctx, agent, world, blackboard),
                None => BtStatus::Success,
            },
        }
    }

    fn abort_children(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        self.condition.request_terminate(ctx, agent, world, blackboard);
        self.then.request_terminate(ctx, agent, world, blackboard);
        if let Some(otherwise) = self.otherwise.as_mut() {
            otherwise.request_terminate(ctx, agent, world, blackboard);
        }
    }
}
