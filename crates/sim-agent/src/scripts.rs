//! The built-in behavior scripts.
//!
//! Scripts are registered once at startup. Leaves read their parameters from the running
//! instance's blackboard scope (target, behavior, goal) and from the catalog entry of the
//! behavior they serve; tuning values from [`SimConfig`] are baked in at registration.

use sim_bt::{BtStatus, BuildError, NodeSpec, ScriptRegistry};
use sim_core::{Blackboard, DeterministicRng, Id, TickContext};
use sim_nav::{GridIndex, NavGridView};
use sim_tools::{emit, TraceEvent};

use crate::actions::Primitive;
use crate::catalog::Effect;
use crate::config::SimConfig;
use crate::keys::Scope;
use crate::world::World;

pub const LEAVE: &str = "leave";
pub const WANDER: &str = "wander";
pub const CHECK_IN: &str = "check_in";
pub const STAFF_RECEPTION: &str = "staff_reception";
pub const USE_FIXTURE: &str = "use_fixture";
pub const USE_EQUIPMENT: &str = "use_equipment";
pub const USE_RACKED_ITEM: &str = "use_racked_item";
pub const DRINK: &str = "drink";
/// Shared fragment: walk to the target's interaction tile.
pub const APPROACH_TARGET: &str = "approach_target";

const WANDER_STREAM: u64 = 0x57A1;
const WANDER_SAMPLES: u32 = 8;

type Spec = NodeSpec<World>;

/// Whether a built-in script can run a behavior with `effect`. Scripts registered by the host
/// accept anything.
pub fn accepts(script: &str, effect: &Effect) -> bool {
    match script {
        USE_FIXTURE | DRINK => matches!(effect, Effect::UseFixture { .. } | Effect::Drink { .. }),
        USE_EQUIPMENT => matches!(effect, Effect::Exercise(_)),
        USE_RACKED_ITEM => matches!(effect, Effect::RackedExercise(_)),
        _ => true,
    }
}

pub fn register_all(
    registry: &mut ScriptRegistry<World>,
    config: &SimConfig,
) -> Result<(), BuildError> {
    registry.register(
        APPROACH_TARGET,
        Spec::sequence(vec![locate_target(), move_to_goal()]),
    )?;

    registry.register(
        USE_FIXTURE,
        Spec::sequence(vec![
            occupy(),
            Spec::script(APPROACH_TARGET),
            use_fixture(),
            release(),
        ]),
    )?;

    registry.register(
        USE_EQUIPMENT,
        Spec::sequence(vec![
            occupy(),
            Spec::script(APPROACH_TARGET),
            exercise(),
            release(),
        ]),
    )?;

    // The barrier lets the item go back on its rack however the exercise ends.
    registry.register(
        USE_RACKED_ITEM,
        Spec::sequence(vec![
            occupy(),
            remember_rack(),
            Spec::script(APPROACH_TARGET),
            pick_up_target(),
            Spec::all(vec![exercise()]),
            put_back(),
            release(),
        ]),
    )?;

    registry.register(
        DRINK,
        Spec::sequence(vec![
            occupy(),
            Spec::script(APPROACH_TARGET),
            take_from_target(),
            use_fixture(),
            release(),
        ]),
    )?;

    let attempt = Spec::sequence(vec![
        Spec::selector(vec![
            occupy(),
            Spec::sequence(vec![
                wait("wait_for_desk", config.check_in_retry_wait_ticks),
                fail(),
            ]),
        ]),
        Spec::script(APPROACH_TARGET),
        wait("check_in_service", config.check_in_service_ticks),
        mark_checked_in(),
        release(),
    ]);
    registry.register(
        CHECK_IN,
        Spec::selector(vec![
            Spec::retry(config.check_in_retries, attempt),
            give_up_check_in(),
        ]),
    )?;

    registry.register(
        STAFF_RECEPTION,
        Spec::sequence(vec![
            occupy(),
            Spec::script(APPROACH_TARGET),
            wait("hold_desk", config.staff_shift_ticks),
            release(),
        ]),
    )?;

    registry.register(
        WANDER,
        Spec::sequence(vec![
            pick_wander_goal(config.wander_radius.max(0)),
            move_to_goal(),
            wait("idle", config.wander_idle_ticks),
        ]),
    )?;

    registry.register(
        LEAVE,
        Spec::sequence(vec![pick_exit(), move_to_goal(), mark_left()]),
    )?;

    Ok(())
}

fn target_of(blackboard: &Blackboard) -> Option<Id> {
    let scope = Scope::current(blackboard);
    blackboard.get(scope.target()).copied().flatten()
}

/// For leaves that only run after `occupy` or `locate_target` found the target.
fn require_target(blackboard: &Blackboard) -> Id {
    target_of(blackboard).unwrap_or_else(|| {
        panic!(
            "behavior scope {:?} reached a target step without a target",
            Scope::current(blackboard)
        )
    })
}

fn record(
    ctx: &TickContext,
    blackboard: &mut Blackboard,
    tag: &'static str,
    world: &World,
    object: Id,
    slot: u64,
) {
    let label = world
        .object(object)
        .map(|o| o.name.clone())
        .unwrap_or_else(|| object.to_string());
    emit(
        blackboard,
        TraceEvent::new(ctx.tick, tag).with_label(label).with_a(slot),
    );
}

fn occupy() -> Spec {
    Spec::task("occupy", |ctx, agent, world, blackboard| {
        let scope = Scope::current(blackboard);
        let Some(owner) = target_of(blackboard).and_then(|t| world.claim_owner(t)) else {
            return BtStatus::Failure;
        };
        match world.try_occupy(agent, owner) {
            Some(slot) => {
                blackboard.set(scope.claimed(), owner);
                record(ctx, blackboard, "claim.occupied", world, owner, slot as u64);
                BtStatus::Success
            }
            None => {
                record(ctx, blackboard, "claim.rejected", world, owner, 0);
                BtStatus::Failure
            }
        }
    })
}

fn release() -> Spec {
    Spec::task("release", |ctx, agent, world, blackboard| {
        let scope = Scope::current(blackboard);
        if let Some(owner) = blackboard.remove(scope.claimed()) {
            world.release_claim(agent, owner);
            record(ctx, blackboard, "claim.released", world, owner, 0);
        }
        BtStatus::Success
    })
}

fn locate_target() -> Spec {
    Spec::task("locate_target", |_ctx, _agent, world, blackboard| {
        let scope = Scope::current(blackboard);
        match target_of(blackboard).and_then(|t| world.interaction_tile(t)) {
            Some(goal) => {
                blackboard.set(scope.goal(), goal);
                BtStatus::Success
            }
            None => BtStatus::Failure,
        }
    })
}

fn move_to_goal() -> Spec {
    Spec::action("move_to", |_ctx, _agent, _world, blackboard| {
        let goal = *blackboard.require(Scope::current(blackboard).goal());
        Primitive::MoveTo { goal }.boxed()
    })
}

fn wait(label: &'static str, ticks: u32) -> Spec {
    Spec::action(label, move |_ctx, _agent, _world, _blackboard| {
        Primitive::Wait { ticks }.boxed()
    })
}

fn fail() -> Spec {
    Spec::task("fail", |_ctx, _agent, _world, _blackboard| BtStatus::Failure)
}

fn use_fixture() -> Spec {
    Spec::action("use_fixture", |_ctx, _agent, world, blackboard| {
        let behavior = *blackboard.require(Scope::current(blackboard).behavior());
        match world.catalog().behavior(behavior).effect {
            Effect::UseFixture {
                need,
                per_tick,
                until,
            }
            | Effect::Drink {
                need,
                per_tick,
                until,
            } => Primitive::UseFixture {
                need,
                per_tick,
                until,
            }
            .boxed(),
            other => panic!("behavior effect {other:?} cannot drive a fixture"),
        }
    })
}

fn exercise() -> Spec {
    Spec::action("exercise", |_ctx, _agent, world, blackboard| {
        let behavior = *blackboard.require(Scope::current(blackboard).behavior());
        match world.catalog().behavior(behavior).effect {
            Effect::Exercise(exercise) | Effect::RackedExercise(exercise) => {
                Primitive::PerformExercise {
                    exercise,
                    remaining: world.catalog().exercise(exercise).duration_ticks,
                }
                .boxed()
            }
            other => panic!("behavior effect {other:?} is not an exercise"),
        }
    })
}

fn remember_rack() -> Spec {
    Spec::task("remember_rack", |_ctx, _agent, world, blackboard| {
        let scope = Scope::current(blackboard);
        let rack = target_of(blackboard)
            .and_then(|t| world.object(t))
            .and_then(|o| o.parent);
        blackboard.set(scope.rack(), rack);
        BtStatus::Success
    })
}

fn pick_up_target() -> Spec {
    Spec::action("pick_up", |_ctx, _agent, _world, blackboard| {
        Primitive::PickUp {
            object: require_target(blackboard),
        }
        .boxed()
    })
}

fn put_back() -> Spec {
    Spec::action("put_back", |_ctx, _agent, _world, blackboard| {
        let scope = Scope::current(blackboard);
        Primitive::PutDown {
            object: require_target(blackboard),
            onto: blackboard.get(scope.rack()).copied().flatten(),
        }
        .boxed()
    })
}

fn take_from_target() -> Spec {
    Spec::action("take_from_dispenser", |_ctx, _agent, _world, blackboard| {
        Primitive::TakeFromDispenser {
            dispenser: require_target(blackboard),
        }
        .boxed()
    })
}

fn mark_checked_in() -> Spec {
    Spec::task("mark_checked_in", |ctx, agent, world, _blackboard| {
        let Some(body) = world.agent_mut(agent) else {
            return BtStatus::Failure;
        };
        body.checked_in = true;
        tracing::debug!(agent = %agent, tick = ctx.tick, "checked in");
        BtStatus::Success
    })
}

fn give_up_check_in() -> Spec {
    Spec::task("give_up_check_in", |ctx, agent, world, _blackboard| {
        if let Some(body) = world.agent_mut(agent) {
            body.check_in_given_up = true;
        }
        tracing::debug!(agent = %agent, tick = ctx.tick, "gave up on check-in");
        BtStatus::Failure
    })
}

fn pick_wander_goal(radius: i32) -> Spec {
    Spec::task("pick_wander_goal", move |ctx, agent, world, blackboard| {
        let Some(origin) = world.agent_tile(agent) else {
            return BtStatus::Failure;
        };
        let mut rng = ctx.rng_for_agent(agent, WANDER_STREAM);
        let goal = (0..WANDER_SAMPLES)
            .map(|_| {
                GridIndex::new(
                    origin.x + rng.next_i32_in(-radius, radius),
                    origin.y + rng.next_i32_in(-radius, radius),
                    origin.z,
                )
            })
            .find(|candidate| world.is_walkable(*candidate))
            .unwrap_or(origin);
        blackboard.set(Scope::current(blackboard).goal(), goal);
        BtStatus::Success
    })
}

/// Nearest exit, first in grid order on ties. Without exits the agent leaves where it stands.
fn pick_exit() -> Spec {
    Spec::task("pick_exit", |_ctx, agent, world, blackboard| {
        let Some(origin) = world.agent_tile(agent) else {
            return BtStatus::Failure;
        };
        let exit = world
            .grid()
            .exit_tiles()
            .min_by(|a, b| origin.distance(*a).total_cmp(&origin.distance(*b)));
        let goal = exit.unwrap_or_else(|| {
            tracing::debug!(agent = %agent, "no exit tile, leaving in place");
            origin
        });
        blackboard.set(Scope::current(blackboard).goal(), goal);
        BtStatus::Success
    })
}

fn mark_left() -> Spec {
    Spec::task("mark_left", |_ctx, agent, world, _blackboard| {
        match world.agent_mut(agent) {
            Some(body) => {
                body.left = true;
                BtStatus::Success
            }
            None => BtStatus::Failure,
        }
    })
}
