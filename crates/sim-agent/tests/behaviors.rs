mod common;

use common::*;
use sim_agent::{
    scoring, BehaviorDef, BehaviorKind, ObjectSpec, Role, Scope, SimConfig, Simulation,
};
use sim_bt::NodeSpec;
use sim_core::SimError;
use sim_needs::HappinessCurve;
use sim_utility::Utility;

#[test]
fn paused_behavior_resumes_without_restarting() {
    let mut sim = sim(quiet_config());
    let guest = checked_in_guest(&mut sim, gi(0, 0));

    sim.set_behavior(guest, "wander", None).unwrap();
    sim.tick();
    assert_eq!(trace_count(&sim, guest, "bt.node.init", "pick_wander_goal"), 1);

    sim.add_behavior(guest, "wander", None).unwrap();
    assert_eq!(sim.brain(guest).unwrap().depth(), 2);
    sim.tick();
    assert_eq!(trace_count(&sim, guest, "bt.node.init", "pick_wander_goal"), 2);
    assert_eq!(trace_count(&sim, guest, "behavior.pause", "wander"), 1);

    assert!(sim.terminate_behavior(guest).unwrap());
    assert_eq!(sim.brain(guest).unwrap().depth(), 1);
    sim.tick();

    // The lower instance carries on with its move step; its first leaf never re-runs.
    assert_eq!(trace_count(&sim, guest, "bt.node.init", "pick_wander_goal"), 2);
    assert!(trace_count(&sim, guest, "bt.node.init", "move_to") >= 1);
    let first_exit = sim
        .brain(guest)
        .unwrap()
        .trace()
        .unwrap()
        .matching("bt.node.exit", "pick_wander_goal")
        .map(|e| e.a)
        .collect::<Vec<_>>();
    assert_eq!(first_exit, vec![0, 0]);
}

#[test]
fn set_behavior_releases_the_whole_stack() {
    let mut sim = sim(quiet_config());
    let treadmill = treadmill(&mut sim);
    let guest = checked_in_guest(&mut sim, gi(0, 0));

    sim.set_behavior(guest, "run_treadmill", Some(treadmill)).unwrap();
    sim.tick();
    assert!(sim.world().holds_claim(guest, treadmill));

    sim.add_behavior(guest, "wander", None).unwrap();
    sim.tick();
    assert!(sim.world().holds_claim(guest, treadmill), "pausing keeps the claim");

    sim.set_behavior(guest, "wander", None).unwrap();
    assert_eq!(sim.brain(guest).unwrap().depth(), 1);
    assert!(!sim.world().holds_claim(guest, treadmill));
}

#[test]
fn releasing_the_top_keeps_a_paused_claim_on_the_same_object() {
    let mut sim = sim(quiet_config());
    let toilet = toilet(&mut sim);
    let guest = checked_in_guest(&mut sim, gi(0, 0));
    let other = checked_in_guest(&mut sim, gi(0, 1));

    sim.set_behavior(guest, "use_toilet", Some(toilet)).unwrap();
    sim.tick();
    assert!(sim.world().holds_claim(guest, toilet));

    // Started on the toilet without claiming it.
    sim.add_behavior(guest, "wander", Some(toilet)).unwrap();
    assert!(sim.terminate_behavior(guest).unwrap());
    assert_eq!(sim.brain(guest).unwrap().depth(), 1);
    assert!(sim.world().holds_claim(guest, toilet));

    // Claims the same slot again and lets it go.
    sim.add_behavior(guest, "use_toilet", Some(toilet)).unwrap();
    sim.tick_agent(guest).unwrap();
    assert!(sim.terminate_behavior(guest).unwrap());
    assert!(sim.world().holds_claim(guest, toilet));

    assert_eq!(sim.world_mut().try_occupy(other, toilet), None);
    assert!(sim.terminate_behavior(guest).unwrap());
    assert!(!sim.world().holds_claim(guest, toilet));
    assert_eq!(sim.world_mut().try_occupy(other, toilet), Some(0));
}

#[test]
fn pausing_stops_the_paused_behavior_walking() {
    let mut sim = sim(quiet_config());
    let toilet = toilet(&mut sim);
    let guest = checked_in_guest(&mut sim, gi(0, 0));

    sim.set_behavior(guest, "use_toilet", Some(toilet)).unwrap();
    let moving = |s: &Simulation| s.world().agent(guest).unwrap().nav.is_moving();
    for _ in 0..5 {
        if moving(&sim) {
            break;
        }
        sim.tick();
    }
    assert!(moving(&sim), "walking to the toilet");

    sim.add_behavior(guest, "wander", None).unwrap();
    assert!(!moving(&sim));
    assert_eq!(sim.update_agent(guest, 1.0).unwrap(), 0);
    assert_eq!(sim.agent_snapshot(guest).unwrap().tile, gi(0, 0));

    // The paused move step plans again once it is back on top.
    assert!(sim.terminate_behavior(guest).unwrap());
    sim.tick();
    assert!(moving(&sim));
}

#[test]
fn released_instance_leaves_no_keys_behind() {
    let mut sim = sim(quiet_config());
    let guest = checked_in_guest(&mut sim, gi(0, 0));
    sim.set_behavior(guest, "wander", None).unwrap();
    sim.tick();

    let scope = sim.brain(guest).unwrap().active().unwrap().scope();
    let bb = sim.brain(guest).unwrap().blackboard();
    assert!(bb.contains(scope.target()));
    assert!(bb.contains(scope.goal()));

    sim.terminate_behavior(guest).unwrap();
    let bb = sim.brain(guest).unwrap().blackboard();
    assert!(!bb.contains(scope.target()));
    assert!(!bb.contains(scope.goal()));
    assert!(!bb.contains(scope.behavior()));
}

#[test]
fn stacked_instances_get_distinct_scopes() {
    let mut sim = sim(quiet_config());
    let guest = checked_in_guest(&mut sim, gi(0, 0));
    sim.set_behavior(guest, "wander", None).unwrap();
    sim.add_behavior(guest, "wander", None).unwrap();

    let scopes: Vec<Scope> = sim
        .brain(guest)
        .unwrap()
        .instances()
        .map(|i| i.scope())
        .collect();
    assert_eq!(scopes.len(), 2);
    assert_ne!(scopes[0], scopes[1]);
}

#[test]
fn removing_an_object_interrupts_its_users() {
    let mut sim = sim(quiet_config());
    let treadmill = treadmill(&mut sim);
    let guest = checked_in_guest(&mut sim, gi(0, 0));
    sim.set_behavior(guest, "run_treadmill", Some(treadmill)).unwrap();
    sim.step();
    sim.step();
    assert_eq!(sim.world().grid().blocker_count(gi(3, 3)), 1);

    sim.remove_object(treadmill).unwrap();

    assert!(sim.world().object(treadmill).is_none());
    assert!(sim.brain(guest).unwrap().is_idle());
    assert_eq!(trace_count(&sim, guest, "behavior.end", "run_treadmill"), 1);
    assert_eq!(sim.world().grid().blocker_count(gi(3, 3)), 0);
    assert!(sim.agent_snapshot(guest).unwrap().held.is_empty());

    // The agent carries on with whatever is left.
    sim.step();
    assert_eq!(active(&sim, guest).as_deref(), Some("wander"));
}

#[test]
fn removing_a_rack_takes_carried_and_racked_items_into_account() {
    let mut sim = sim(quiet_config());
    let rack = sim
        .add_object(ObjectSpec::new("rack", gi(5, 5)).interaction(gi(5, 4)).slots(1, 0))
        .unwrap();
    let bar = sim
        .add_object(ObjectSpec::new("bar", gi(5, 5)).walkable().behavior("lift_barbell"))
        .unwrap();
    let plate = sim
        .add_object(ObjectSpec::new("plate", gi(5, 5)).walkable())
        .unwrap();
    sim.rack_object(bar, rack).unwrap();
    sim.rack_object(plate, rack).unwrap();

    let guest = checked_in_guest(&mut sim, gi(5, 4));
    sim.set_behavior(guest, "lift_barbell", Some(bar)).unwrap();
    step_until(&mut sim, 20, |s| s.world().object(bar).unwrap().holder == Some(guest))
        .expect("picked up");

    sim.remove_object(rack).unwrap();

    assert!(sim.world().object(rack).is_none());
    assert!(sim.world().object(plate).is_none());
    // The bar was in hand, not on the rack; it is dropped where the guest stands.
    let bar = sim.world().object(bar).expect("bar survives");
    assert_eq!(bar.holder, None);
    assert_eq!(bar.parent, None);
    assert_eq!(bar.tile, gi(5, 4));
    assert!(sim.brain(guest).unwrap().is_idle());
}

#[test]
fn despawn_releases_claims_and_drops_items() {
    let mut sim = sim(quiet_config());
    let treadmill = treadmill(&mut sim);
    let ball = sim
        .add_object(ObjectSpec::new("ball", gi(1, 1)).walkable())
        .unwrap();
    let guest = checked_in_guest(&mut sim, gi(1, 1));
    sim.set_behavior(guest, "run_treadmill", Some(treadmill)).unwrap();
    sim.tick();
    assert!(sim.world_mut().pick_up(guest, ball));

    sim.despawn_agent(guest).unwrap();

    assert!(!sim.world().holds_claim(guest, treadmill));
    assert!(sim.world().agent(guest).is_none());
    assert!(sim.brain(guest).is_none());
    assert_eq!(sim.world().object(ball).unwrap().holder, None);
    assert!(matches!(
        sim.despawn_agent(guest),
        Err(SimError::AgentNotFound(id)) if id == guest
    ));
}

#[test]
fn stale_agent_ids_do_not_alias() {
    let mut sim = sim(quiet_config());
    let first = sim.spawn_agent(Role::Guest, gi(0, 0)).unwrap();
    sim.despawn_agent(first).unwrap();
    let second = sim.spawn_agent(Role::Guest, gi(0, 0)).unwrap();

    assert_eq!(first.index(), second.index());
    assert_ne!(first, second);
    assert!(sim.agent_snapshot(first).is_none());
    assert!(sim.set_behavior(first, "wander", None).is_err());
}

#[test]
fn unknown_names_are_reported() {
    let mut sim = sim(quiet_config());
    let guest = sim.spawn_agent(Role::Guest, gi(0, 0)).unwrap();

    assert!(matches!(
        sim.set_behavior(guest, "juggle", None),
        Err(SimError::UnknownBehavior(name)) if name == "juggle"
    ));
    assert!(matches!(
        sim.add_object(ObjectSpec::new("x", gi(1, 1)).behavior("juggle")),
        Err(SimError::UnknownBehavior(_))
    ));
    assert!(matches!(
        sim.set_need(guest, "Boredom", 3),
        Err(SimError::UnknownNeed(_))
    ));
    assert!(sim.spawn_agent(Role::Guest, gi(-1, 0)).is_err());
}

#[test]
fn mismatched_script_is_a_config_error() {
    let mut config = SimConfig::default();
    config.behaviors.push(BehaviorDef {
        name: "nap".to_string(),
        script: "use_equipment".to_string(),
        kind: BehaviorKind::UseFixture {
            need: "Energy".to_string(),
            per_tick: -1,
            until: 0,
        },
    });
    let err = Simulation::new(config, open_grid(4, 4)).err().expect("rejected");
    assert!(matches!(err, SimError::Config(msg) if msg.contains("nap")));

    let mut config = SimConfig::default();
    config.behaviors[0].script = "missing".to_string();
    assert!(matches!(
        Simulation::new(config, open_grid(4, 4)),
        Err(SimError::UnknownScript(_))
    ));

    let config = SimConfig {
        check_in_retries: 0,
        ..SimConfig::default()
    };
    assert!(matches!(
        Simulation::new(config, open_grid(4, 4)),
        Err(SimError::Config(_))
    ));
}

#[test]
fn host_scripts_can_reuse_built_in_fragments() {
    let mut config = quiet_config();
    config.behaviors.push(BehaviorDef {
        name: "visit".to_string(),
        script: "visit".to_string(),
        kind: BehaviorKind::Wander,
    });
    let mut sim = Simulation::with_scripts(config, open_grid(8, 8), |registry| {
        registry
            .register("visit", NodeSpec::script("approach_target"))
            .map(|_| ())
    })
    .unwrap();
    let toilet = toilet(&mut sim);
    let guest = sim.spawn_agent(Role::Guest, gi(0, 0)).unwrap();

    sim.set_behavior(guest, "visit", Some(toilet)).unwrap();
    step_until(&mut sim, 30, |s| s.brain(guest).unwrap().is_idle()).expect("visit finished");
    assert_eq!(sim.agent_snapshot(guest).unwrap().tile, gi(6, 5));
}

#[test]
fn scoring_follows_agent_state() {
    let mut sim = sim(quiet_config());
    sim.add_object(
        ObjectSpec::new("reception", gi(4, 0))
            .interaction(gi(4, 1))
            .slots(1, 1)
            .behavior("check_in"),
    )
    .unwrap();
    toilet(&mut sim);
    let guest = sim.spawn_agent(Role::Guest, gi(0, 0)).unwrap();
    sim.set_need(guest, "Toilet", 100).unwrap();

    let score_of = |sim: &Simulation, name: &str| {
        let world = sim.world();
        let body = world.agent(guest).unwrap();
        let id = world.catalog().behavior_id(sim.symbols(), name).unwrap();
        world
            .advertised()
            .iter()
            .filter(|o| o.behavior == id)
            .map(|o| scoring::score(world, body, o))
            .fold(Utility::NEVER, f32::max)
    };

    assert_eq!(score_of(&sim, "leave"), Utility::NEVER);
    assert_eq!(score_of(&sim, "wander"), 0.0);
    assert!(score_of(&sim, "check_in") > 0.0);
    assert_eq!(score_of(&sim, "use_toilet"), Utility::NEVER, "not checked in yet");

    sim.check_in(guest).unwrap();
    assert_eq!(score_of(&sim, "check_in"), Utility::NEVER);
    assert!(score_of(&sim, "use_toilet") > 0.0);

    let max_stay = sim.world().config().max_stay_ticks;
    sim.world_mut().agent_mut(guest).unwrap().stay_ticks = max_stay;
    assert_eq!(score_of(&sim, "leave"), Utility::MUST);
}

#[test]
fn snapshot_serializes() {
    let mut sim = sim(quiet_config());
    let guest = checked_in_guest(&mut sim, gi(2, 2));
    sim.set_behavior(guest, "wander", None).unwrap();
    let json = serde_json::to_value(sim.agent_snapshot(guest).unwrap()).unwrap();
    assert_eq!(json["active_behavior"], "wander");
    assert_eq!(json["checked_in"], true);
    assert_eq!(json["tile"]["x"], 2);
}

#[test]
fn recent_distress_raises_need_scores() {
    let mut config = SimConfig {
        wander_idle_ticks: 10,
        ..quiet_config()
    };
    for need in &mut config.needs {
        if need.name == "Toilet" {
            need.curve = HappinessCurve::Flat { penalty: 2.0 };
        }
    }
    let mut sim = sim(config);
    toilet(&mut sim);
    let guest = checked_in_guest(&mut sim, gi(0, 0));
    sim.set_need(guest, "Toilet", 100).unwrap();

    let toilet_score = |sim: &Simulation| {
        let world = sim.world();
        let body = world.agent(guest).unwrap();
        let id = world.catalog().behavior_id(sim.symbols(), "use_toilet").unwrap();
        world
            .advertised()
            .iter()
            .filter(|o| o.behavior == id)
            .map(|o| scoring::score(world, body, o))
            .fold(Utility::NEVER, f32::max)
    };
    let calm = toilet_score(&sim);
    assert!(calm > 0.0);
    assert_eq!(sim.agent_snapshot(guest).unwrap().neediness, 0.0);

    // Busy on something else, so the needs tick without a new selection or any movement.
    sim.set_behavior(guest, "wander", None).unwrap();
    for _ in 0..3 {
        sim.tick();
    }
    let snapshot = sim.agent_snapshot(guest).unwrap();
    assert_eq!(snapshot.neediness, 2.0);
    assert_eq!(snapshot.tile, gi(0, 0));
    assert!((toilet_score(&sim) - calm * 3.0).abs() < 1e-4);

    let json = serde_json::to_value(snapshot).unwrap();
    assert_eq!(json["neediness"], 2.0);
}
