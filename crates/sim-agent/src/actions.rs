//! Action primitives: the leaf-level work behavior scripts are made of.

use sim_core::{Action, ActionStatus, Blackboard, Id, TickContext};
use sim_nav::GridIndex;
use sim_needs::NeedId;

use crate::catalog::ExerciseId;
use crate::keys::Scope;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Walk to `goal`. Movement itself happens in `Simulation::update`.
    MoveTo { goal: GridIndex },
    PickUp { object: Id },
    /// Put a carried object onto `onto`, or on the agent's tile.
    PutDown { object: Id, onto: Option<Id> },
    PerformExercise { exercise: ExerciseId, remaining: u32 },
    /// Apply `per_tick` to `need` until it reaches `until`.
    UseFixture {
        need: NeedId,
        per_tick: i32,
        until: i32,
    },
    /// Idle; succeeds on the `ticks`-th tick (at once for 0).
    Wait { ticks: u32 },
    TakeFromDispenser { dispenser: Id },
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::MoveTo { .. } => "move_to",
            Primitive::PickUp { .. } => "pick_up",
            Primitive::PutDown { .. } => "put_down",
            Primitive::PerformExercise { .. } => "perform_exercise",
            Primitive::UseFixture { .. } => "use_fixture",
            Primitive::Wait { .. } => "wait",
            Primitive::TakeFromDispenser { .. } => "take_from_dispenser",
        }
    }

    pub fn boxed(self) -> Box<dyn Action<World>> {
        Box::new(self)
    }
}

fn reached(value: i32, per_tick: i32, until: i32) -> bool {
    match per_tick.signum() {
        -1 => value <= until,
        1 => value >= until,
        _ => true,
    }
}

impl Action<World> for Primitive {
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: Id,
        world: &mut World,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        match self {
            Primitive::MoveTo { goal } => {
                if world.has_arrived(agent, *goal) {
                    return ActionStatus::Success;
                }
                match world.request_path(agent, *goal) {
                    None => ActionStatus::Failed,
                    Some(Err(err)) => {
                        tracing::debug!(
                            agent = %agent,
                            goal = %goal,
                            %err,
                            tick = ctx.tick,
                            "move failed"
                        );
                        ActionStatus::Failed
                    }
                    Some(Ok(_)) if world.has_arrived(agent, *goal) => ActionStatus::Success,
                    Some(Ok(_)) => ActionStatus::Waiting,
                }
            }

            Primitive::PickUp { object } => {
                if !world.pick_up(agent, *object) {
                    tracing::debug!(agent = %agent, object = %object, "pick up rejected");
                    return ActionStatus::Failed;
                }
                if let Some(scope) = Scope::active(blackboard) {
                    let held = blackboard.get_or_insert_with(scope.held(), Vec::new);
                    if !held.contains(object) {
                        held.push(*object);
                    }
                }
                ActionStatus::Success
            }

            Primitive::PutDown { object, onto } => {
                if !world.put_down(agent, *object, *onto) {
                    tracing::debug!(agent = %agent, object = %object, "put down rejected: not held");
                    return ActionStatus::Failed;
                }
                let scope = Scope::active(blackboard);
                if let Some(held) = scope.and_then(|scope| blackboard.get_mut(scope.held())) {
                    held.retain(|h| h != object);
                }
                ActionStatus::Success
            }

            Primitive::PerformExercise {
                exercise,
                remaining,
            } => {
                if *remaining == 0 {
                    return ActionStatus::Success;
                }
                let modifiers = world.catalog().exercise(*exercise).modifiers.clone();
                for (need, per_tick) in modifiers {
                    if world.apply_need_delta(agent, need, per_tick).is_none() {
                        return ActionStatus::Failed;
                    }
                }
                *remaining -= 1;
                if *remaining == 0 {
                    ActionStatus::Success
                } else {
                    ActionStatus::Waiting
                }
            }

            Primitive::UseFixture {
                need,
                per_tick,
                until,
            } => {
                let Some(value) = world.need_value(agent, *need) else {
                    return ActionStatus::Failed;
                };
                if reached(value, *per_tick, *until) {
                    return ActionStatus::Success;
                }
                match world.apply_need_delta(agent, *need, *per_tick) {
                    Some(value) if reached(value, *per_tick, *until) => ActionStatus::Success,
                    Some(_) => ActionStatus::Waiting,
                    None => ActionStatus::Failed,
                }
            }

            Primitive::Wait { ticks } => {
                if *ticks <= 1 {
                    *ticks = 0;
                    return ActionStatus::Success;
                }
                *ticks -= 1;
                ActionStatus::Waiting
            }

            Primitive::TakeFromDispenser { dispenser } => {
                if world.take_from_dispenser(*dispenser) {
                    ActionStatus::Success
                } else {
                    ActionStatus::Failed
                }
            }
        }
    }

    fn cancel(
        &mut self,
        _ctx: &TickContext,
        agent: Id,
        world: &mut World,
        _blackboard: &mut Blackboard,
    ) {
        if let Primitive::MoveTo { .. } = self {
            world.clear_path(agent);
        }
    }
}
