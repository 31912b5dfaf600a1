//! Utility scores for advertised behaviors.

use sim_utility::{distance_penalty, queue_penalty, Utility};

use crate::agent::{AgentBody, Role};
use crate::catalog::Effect;
use crate::world::{Offer, World};

/// Score `offer` for `agent` against the current world state.
pub fn score(world: &World, agent: &AgentBody, offer: &Offer) -> f32 {
    let config = world.config();
    let behavior = world.catalog().behavior(offer.behavior);

    match behavior.effect {
        Effect::Leave => {
            let unhappy = agent.needs.happiness() <= config.happiness_floor;
            let overstayed = agent.stay_ticks >= config.max_stay_ticks;
            if unhappy || overstayed || agent.check_in_given_up {
                Utility::MUST
            } else {
                Utility::NEVER
            }
        }
        Effect::Wander => 0.0,
        Effect::CheckIn => {
            if agent.role != Role::Guest || agent.checked_in || agent.check_in_given_up {
                return Utility::NEVER;
            }
            reach(world, agent, offer).map_or(Utility::NEVER, |r| config.check_in_priority * r)
        }
        Effect::StaffReception => {
            if agent.role != Role::Staff {
                return Utility::NEVER;
            }
            reach(world, agent, offer).map_or(Utility::NEVER, |r| config.staff_duty_priority * r)
        }
        Effect::UseFixture { .. }
        | Effect::Exercise(_)
        | Effect::RackedExercise(_)
        | Effect::Drink { .. } => {
            if agent.role == Role::Guest && !agent.checked_in {
                return Utility::NEVER;
            }
            if let Effect::Drink { .. } = behavior.effect {
                let empty = offer
                    .object
                    .and_then(|id| world.object(id))
                    .is_some_and(|o| o.quantity == Some(0));
                if empty {
                    return Utility::NEVER;
                }
            }
            let catalog = world.catalog().needs();
            let urgency: f32 = world
                .catalog()
                .reduces(offer.behavior)
                .into_iter()
                .map(|need| agent.needs.urgency(catalog, need))
                .sum();
            // Recent distress makes every need-driven offer more pressing.
            let pressure = 1.0 + agent.needs.neediness().max(0.0);
            reach(world, agent, offer).map_or(Utility::NEVER, |r| urgency * pressure * r)
        }
    }
}

/// Distance times queue penalty for an object-bound offer; `None` when the object is gone or
/// carried.
fn reach(world: &World, agent: &AgentBody, offer: &Offer) -> Option<f32> {
    let object = offer.object.and_then(|id| world.object(id))?;
    if object.is_held() {
        return None;
    }
    let distance = agent.nav.tile().distance(object.interaction);
    let free = world.has_free_slot(object.id, agent.role.claim_group());
    Some(distance_penalty(distance) * queue_penalty(free))
}
