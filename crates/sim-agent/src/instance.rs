use sim_bt::{BehaviorTree, BtStatus};
use sim_core::{Blackboard, Id, TickContext};
use sim_tools::{emit, TraceEvent};

use crate::catalog::BehaviorId;
use crate::keys::{Scope, ACTIVE_SCOPE};
use crate::world::World;

/// One running execution of a behavior for one agent.
///
/// The instance owns a blackboard namespace for its whole life; releasing it terminates the tree,
/// gives back whatever the instance still holds and drops the namespace.
pub struct BehaviorInstance {
    behavior: BehaviorId,
    label: String,
    target: Option<Id>,
    scope: Scope,
    tree: BehaviorTree<World>,
}

impl BehaviorInstance {
    pub fn new(
        behavior: BehaviorId,
        label: impl Into<String>,
        target: Option<Id>,
        scope: Scope,
        tree: BehaviorTree<World>,
        blackboard: &mut Blackboard,
    ) -> Self {
        blackboard.set(scope.target(), target);
        blackboard.set(scope.behavior(), behavior);
        Self {
            behavior,
            label: label.into(),
            target,
            scope,
            tree,
        }
    }

    pub fn behavior(&self) -> BehaviorId {
        self.behavior
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> Option<Id> {
        self.target
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn tree(&self) -> &BehaviorTree<World> {
        &self.tree
    }

    pub fn tick(
        &mut self,
        ctx: &TickContext,
        agent: Id,
        world: &mut World,
        blackboard: &mut Blackboard,
    ) -> BtStatus {
        blackboard.set(ACTIVE_SCOPE, self.scope.namespace());
        self.tree.tick(ctx, agent, world, blackboard)
    }

    /// Object whose claim slot this instance took, if it still holds one.
    pub fn claimed(&self, blackboard: &Blackboard) -> Option<Id> {
        blackboard.get(self.scope.claimed()).copied()
    }

    /// Terminate the tree, then hand back the claim this instance took and the objects it
    /// carries, and clear the namespace. Owners in `retained` are still claimed by paused
    /// instances below this one and keep their slot.
    pub fn release(
        mut self,
        ctx: &TickContext,
        agent: Id,
        world: &mut World,
        blackboard: &mut Blackboard,
        retained: &[Id],
    ) {
        let scope = self.scope;
        blackboard.set(ACTIVE_SCOPE, scope.namespace());
        self.tree.request_terminate(ctx, agent, world, blackboard);

        if let Some(owner) = blackboard.remove(scope.claimed()) {
            if !retained.contains(&owner) {
                world.release_claim(agent, owner);
            }
        }
        for object in blackboard.remove(scope.held()).unwrap_or_default() {
            world.put_down(agent, object, None);
        }

        blackboard.clear_namespace(scope.namespace());
        blackboard.remove(ACTIVE_SCOPE);
        tracing::debug!(
            agent = %agent,
            behavior = %self.label,
            status = ?self.tree.last_status(),
            tick = ctx.tick,
            "behavior released"
        );
        emit(
            blackboard,
            TraceEvent::new(ctx.tick, "behavior.end").with_label(self.label),
        );
    }
}
