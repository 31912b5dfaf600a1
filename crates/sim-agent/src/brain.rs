use sim_bt::{BehaviorTree, BtStatus};
use sim_core::{Blackboard, Id, TickContext};
use sim_tools::{emit, TraceEvent, TraceLog, TRACE_LOG};
use sim_utility::UtilitySelector;

use crate::catalog::BehaviorId;
use crate::instance::BehaviorInstance;
use crate::keys::Scope;
use crate::scoring;
use crate::world::{Offer, World};

/// The deciding side of an agent: blackboard, behavior stack and selector.
///
/// Only the top of the stack runs. Instances below it are paused, not terminated, and resume
/// where they left off once everything above them is gone.
pub struct Brain {
    agent: Id,
    blackboard: Blackboard,
    stack: Vec<BehaviorInstance>,
    selector: UtilitySelector<Offer>,
    next_scope: Scope,
}

impl Brain {
    pub fn new(agent: Id, trace: bool) -> Self {
        let mut blackboard = Blackboard::new();
        if trace {
            blackboard.set(TRACE_LOG, TraceLog::default());
        }
        Self {
            agent,
            blackboard,
            stack: Vec::new(),
            selector: UtilitySelector::new(),
            next_scope: Scope::default(),
        }
    }

    pub fn agent(&self) -> Id {
        self.agent
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn selector(&self) -> &UtilitySelector<Offer> {
        &self.selector
    }

    /// Recorded events, when tracing is on.
    pub fn trace(&self) -> Option<&TraceLog> {
        self.blackboard.get(TRACE_LOG)
    }

    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn active(&self) -> Option<&BehaviorInstance> {
        self.stack.last()
    }

    pub fn active_label(&self) -> Option<&str> {
        self.active().map(BehaviorInstance::label)
    }

    pub fn instances(&self) -> impl Iterator<Item = &BehaviorInstance> {
        self.stack.iter()
    }

    /// Whether any instance on the stack was started on one of `objects`.
    pub fn targets_any(&self, objects: &[Id]) -> bool {
        self.stack
            .iter()
            .any(|i| i.target().is_some_and(|t| objects.contains(&t)))
    }

    /// Pick the best offer for this agent. `None` when nothing is selectable.
    pub fn choose(&mut self, world: &World, offers: &[Offer]) -> Option<Offer> {
        let body = world.agent(self.agent)?;
        let index = self
            .selector
            .select(offers.iter().map(|o| (*o, scoring::score(world, body, o))))?;
        offers.get(index).copied()
    }

    fn allocate_scope(&mut self) -> Scope {
        loop {
            let candidate = self.next_scope;
            self.next_scope = candidate.next();
            if self.stack.iter().all(|i| i.scope() != candidate) {
                return candidate;
            }
        }
    }

    fn push(
        &mut self,
        ctx: &TickContext,
        behavior: BehaviorId,
        label: String,
        target: Option<Id>,
        tree: BehaviorTree<World>,
    ) {
        let scope = self.allocate_scope();
        emit(
            &mut self.blackboard,
            TraceEvent::new(ctx.tick, "behavior.start").with_label(label.clone()),
        );
        let instance =
            BehaviorInstance::new(behavior, label, target, scope, tree, &mut self.blackboard);
        self.stack.push(instance);
    }

    /// Replace the whole stack with a new behavior.
    pub fn set_behavior(
        &mut self,
        ctx: &TickContext,
        world: &mut World,
        behavior: BehaviorId,
        label: String,
        target: Option<Id>,
        tree: BehaviorTree<World>,
    ) {
        self.terminate_all(ctx, world);
        self.push(ctx, behavior, label, target, tree);
    }

    /// Pause the active behavior and run a new one on top of it.
    ///
    /// The paused behavior keeps its claims and carried objects but not its path; its move step
    /// plans again when it resumes.
    pub fn add_behavior(
        &mut self,
        ctx: &TickContext,
        world: &mut World,
        behavior: BehaviorId,
        label: String,
        target: Option<Id>,
        tree: BehaviorTree<World>,
    ) {
        if let Some(paused) = self.stack.last() {
            world.clear_path(self.agent);
            emit(
                &mut self.blackboard,
                TraceEvent::new(ctx.tick, "behavior.pause").with_label(paused.label().to_string()),
            );
        }
        self.push(ctx, behavior, label, target, tree);
    }

    /// Release the active behavior. `false` when the stack was empty.
    pub fn terminate_behavior(&mut self, ctx: &TickContext, world: &mut World) -> bool {
        match self.stack.pop() {
            Some(instance) => {
                let retained: Vec<Id> = self
                    .stack
                    .iter()
                    .filter_map(|i| i.claimed(&self.blackboard))
                    .collect();
                instance.release(ctx, self.agent, world, &mut self.blackboard, &retained);
                true
            }
            None => false,
        }
    }

    /// Release every behavior, top first.
    pub fn terminate_all(&mut self, ctx: &TickContext, world: &mut World) {
        while self.terminate_behavior(ctx, world) {}
    }

    /// Tick the active behavior; a finished one is released and popped. `None` when idle.
    pub fn tick(&mut self, ctx: &TickContext, world: &mut World) -> Option<BtStatus> {
        let instance = self.stack.last_mut()?;
        let status = instance.tick(ctx, self.agent, world, &mut self.blackboard);
        if status != BtStatus::Running {
            self.terminate_behavior(ctx, world);
        }
        Some(status)
    }
}
