#![allow(dead_code)]

use sim_agent::{ObjectSpec, Role, SimConfig, Simulation};
use sim_core::Id;
use sim_nav::{GridIndex, TileGrid};
use sim_needs::HappinessCurve;

pub fn gi(x: i32, y: i32) -> GridIndex {
    GridIndex::new(x, y, 0)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Open floor with a spawn tile at the top-left corner and an exit at the bottom-left one.
pub fn open_grid(width: u32, height: u32) -> TileGrid {
    let mut grid = TileGrid::new(width, height, 1);
    grid.set_spawn(gi(0, 0), true);
    grid.set_exit(gi(0, height as i32 - 1), true);
    grid
}

/// Defaults with needs frozen and happiness untouched, so scenarios control every value.
pub fn quiet_config() -> SimConfig {
    let mut config = SimConfig {
        trace: true,
        ..SimConfig::default()
    };
    for need in &mut config.needs {
        need.idle_delta = 0;
        need.curve = HappinessCurve::Flat { penalty: 0.0 };
    }
    config
}

pub fn sim(config: SimConfig) -> Simulation {
    init_tracing();
    Simulation::new(config, open_grid(10, 10)).expect("valid simulation")
}

pub fn toilet(sim: &mut Simulation) -> Id {
    sim.add_object(
        ObjectSpec::new("toilet", gi(6, 6))
            .interaction(gi(6, 5))
            .slots(1, 0)
            .behavior("use_toilet"),
    )
    .expect("toilet")
}

pub fn treadmill(sim: &mut Simulation) -> Id {
    sim.add_object(
        ObjectSpec::new("treadmill", gi(3, 3))
            .interaction(gi(3, 2))
            .slots(1, 0)
            .behavior("run_treadmill"),
    )
    .expect("treadmill")
}

pub fn checked_in_guest(sim: &mut Simulation, at: GridIndex) -> Id {
    let guest = sim.spawn_agent(Role::Guest, at).expect("spawn");
    sim.check_in(guest).expect("check in");
    guest
}

pub fn need(sim: &Simulation, agent: Id, name: &str) -> i32 {
    sim.agent_snapshot(agent)
        .and_then(|s| s.need(name))
        .expect("need exists")
}

pub fn active(sim: &Simulation, agent: Id) -> Option<String> {
    sim.agent_snapshot(agent).and_then(|s| s.active_behavior)
}

/// Step until `done` holds; returns the number of steps taken.
pub fn step_until(
    sim: &mut Simulation,
    limit: usize,
    mut done: impl FnMut(&Simulation) -> bool,
) -> Option<usize> {
    for steps in 0..limit {
        if done(sim) {
            return Some(steps);
        }
        sim.step();
    }
    done(sim).then_some(limit)
}

pub fn trace_count(sim: &Simulation, agent: Id, tag: &str, label: &str) -> usize {
    sim.brain(agent)
        .and_then(|b| b.trace())
        .map_or(0, |log| log.count(tag, label))
}
