use sim_core::{Action, Blackboard, TickContext, WorldMut};

use crate::bt::{BtNode, BtStatus, Exit};

/// Succeeds when the predicate holds, fails otherwise. Never runs.
pub struct Condition<F> {
    cond: F,
}

impl<F> Condition<F> {
    pub fn new(cond: F) -> Self {
        Self { cond }
    }
}

impl<F, W> BtNode<W> for Condition<F>
where
    F: FnMut(&TickContext, W::Agent, &W, &Blackboard) -> bool + 'static,
    W: WorldMut + 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        if (self.cond)(ctx, agent, &*world, &*blackboard) {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }
}

/// Inline logic with full world access.
pub struct Task<F> {
    run: F,
}

impl<F> Task<F> {
    pub fn new(run: F) -> Self {
        Self { run }
    }
}

impl<F, W> BtNode<W> for Task<F>
where
    F: FnMut(&TickContext, W::Agent, &mut W, &mut Blackboard) -> BtStatus + 'static,
    W: WorldMut + 'static,
{
    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        (self.run)(ctx, agent, world, blackboard)
    }
}

type MakeAction<W> =
    Box<dyn FnMut(&TickContext, <W as sim_core::WorldView>::Agent, &W, &Blackboard) -> Box<dyn Action<W>>>;

/// Runs one action primitive per activation.
///
/// The action is built fresh in `initialize`, so every activation restarts it; an aborted
/// activation cancels it.
pub struct RunAction<W>
where
    W: WorldMut + 'static,
{
    make: MakeAction<W>,
    current: Option<Box<dyn Action<W>>>,
}

impl<W> RunAction<W>
where
    W: WorldMut + 'static,
{
    pub fn new(
        make: impl FnMut(&TickContext, W::Agent, &W, &Blackboard) -> Box<dyn Action<W>> + 'static,
    ) -> Self {
        Self {
            make: Box::new(make),
            current: None,
        }
    }
}

impl<W> BtNode<W> for RunAction<W>
where
    W: WorldMut + 'static,
{
    fn initialize(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        self.current = Some((self.make)(ctx, agent, &*world, &*blackboard));
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        let Some(action) = self.current.as_mut() else {
            return BtStatus::Failure;
        };
        action.tick(ctx, agent, world, blackboard).into()
    }

    fn terminate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
        exit: Exit,
    ) {
        if let Some(mut action) = self.current.take() {
            if exit == Exit::Aborted {
                action.cancel(ctx, agent, world, blackboard);
            }
        }
    }
}
