//! Simulation configuration, loaded from YAML.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sim_needs::{HappinessCurve, NeedCategory, NeedDef};

use crate::catalog::{BehaviorDef, BehaviorKind, ExerciseDef, NeedModifier};

/// Tuning and content for one simulation. Every field has a default; the defaults describe a
/// small gym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Root seed for every random stream.
    pub seed: u64,

    /// Wall time covered by one decision tick.
    pub tick_seconds: f32,

    /// Movement speed in tiles per second.
    pub walk_speed: f32,

    pub max_happiness: f32,

    /// Guests at or below this happiness leave.
    pub happiness_floor: f32,

    /// Guests leave after this many ticks on site.
    pub max_stay_ticks: u64,

    /// Check-in attempts before a guest gives up and leaves.
    pub check_in_retries: u32,

    /// Ticks spent at the desk once served.
    pub check_in_service_ticks: u32,

    /// Ticks waited between check-in attempts when the desk is full.
    pub check_in_retry_wait_ticks: u32,

    pub check_in_priority: f32,

    pub staff_duty_priority: f32,

    /// Ticks a staff member holds the desk before re-deciding.
    pub staff_shift_ticks: u32,

    /// Max distance in tiles of a wander target.
    pub wander_radius: i32,

    pub wander_idle_ticks: u32,

    /// Samples kept for the neediness average.
    pub rolling_window: usize,

    pub path_expansion_cap: usize,

    /// Record node lifecycle and claim events into each agent's blackboard.
    pub trace: bool,

    pub needs: Vec<NeedDef>,

    pub exercises: Vec<ExerciseDef>,

    pub behaviors: Vec<BehaviorDef>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_seconds: 0.5,
            walk_speed: 4.0,
            max_happiness: 100.0,
            happiness_floor: 10.0,
            max_stay_ticks: 2_000,
            check_in_retries: 3,
            check_in_service_ticks: 4,
            check_in_retry_wait_ticks: 5,
            check_in_priority: 10.0,
            staff_duty_priority: 5.0,
            staff_shift_ticks: 200,
            wander_radius: 4,
            wander_idle_ticks: 3,
            rolling_window: 20,
            path_expansion_cap: sim_nav::MAX_EXPANSIONS,
            trace: false,
            needs: default_needs(),
            exercises: default_exercises(),
            behaviors: default_behaviors(),
        }
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("invalid simulation config")?;
        Ok(config)
    }
}

fn default_needs() -> Vec<NeedDef> {
    vec![
        NeedDef::new("Toilet", NeedCategory::Body)
            .with_idle_delta(1)
            .with_initial(20)
            .with_curve(HappinessCurve::Power {
                scale: 0.2,
                exponent: 2.0,
            }),
        NeedDef::new("Thirst", NeedCategory::Body)
            .with_idle_delta(1)
            .with_initial(10)
            .with_curve(HappinessCurve::Linear { scale: 0.1 }),
        NeedDef::new("Energy", NeedCategory::Body)
            .with_threshold(60)
            .with_curve(HappinessCurve::Power {
                scale: 0.2,
                exponent: 2.0,
            }),
        NeedDef::new("Cardio", NeedCategory::Fitness)
            .with_idle_delta(1)
            .with_initial(40)
            .with_threshold(30)
            .with_curve(HappinessCurve::Linear { scale: 0.05 }),
        NeedDef::new("Strength", NeedCategory::Fitness)
            .with_idle_delta(1)
            .with_initial(40)
            .with_threshold(30)
            .with_curve(HappinessCurve::Linear { scale: 0.05 }),
    ]
}

fn modifier(need: &str, per_tick: i32) -> NeedModifier {
    NeedModifier {
        need: need.to_string(),
        per_tick,
    }
}

fn default_exercises() -> Vec<ExerciseDef> {
    vec![
        ExerciseDef {
            name: "treadmill_run".to_string(),
            duration_ticks: 20,
            modifiers: vec![
                modifier("Cardio", -4),
                modifier("Energy", 2),
                modifier("Thirst", 1),
            ],
        },
        ExerciseDef {
            name: "barbell_lift".to_string(),
            duration_ticks: 15,
            modifiers: vec![
                modifier("Strength", -5),
                modifier("Energy", 3),
                modifier("Thirst", 1),
            ],
        },
    ]
}

fn behavior(name: &str, script: &str, kind: BehaviorKind) -> BehaviorDef {
    BehaviorDef {
        name: name.to_string(),
        script: script.to_string(),
        kind,
    }
}

fn default_behaviors() -> Vec<BehaviorDef> {
    vec![
        behavior("leave", "leave", BehaviorKind::Leave),
        behavior("wander", "wander", BehaviorKind::Wander),
        behavior("check_in", "check_in", BehaviorKind::CheckIn),
        behavior("staff_reception", "staff_reception", BehaviorKind::StaffReception),
        behavior(
            "use_toilet",
            "use_fixture",
            BehaviorKind::UseFixture {
                need: "Toilet".to_string(),
                per_tick: -10,
                until: 0,
            },
        ),
        behavior(
            "rest",
            "use_fixture",
            BehaviorKind::UseFixture {
                need: "Energy".to_string(),
                per_tick: -5,
                until: 0,
            },
        ),
        behavior(
            "run_treadmill",
            "use_equipment",
            BehaviorKind::Exercise {
                exercise: "treadmill_run".to_string(),
            },
        ),
        behavior(
            "lift_barbell",
            "use_racked_item",
            BehaviorKind::RackedExercise {
                exercise: "barbell_lift".to_string(),
            },
        ),
        behavior(
            "drink_water",
            "drink",
            BehaviorKind::Drink {
                need: "Thirst".to_string(),
                per_tick: -20,
                until: 0,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = SimConfig::from_yaml_str("seed: 42\nwalk_speed: 2.5\n").expect("valid yaml");
        assert_eq!(config.seed, 42);
        assert_eq!(config.walk_speed, 2.5);
        assert_eq!(config.check_in_retries, 3);
        assert_eq!(config.needs.len(), 5);
        assert_eq!(config.behaviors.len(), 9);
    }

    #[test]
    fn defaults_roundtrip_through_yaml() {
        let config = SimConfig::default();
        let yaml = serde_yaml::to_string(&config).expect("serialize");
        let back = SimConfig::from_yaml_str(&yaml).expect("parse");
        assert_eq!(config, back);
    }

    #[test]
    fn load_reports_the_path() {
        let err = SimConfig::load(Path::new("/nonexistent/sim.yaml")).expect_err("missing file");
        assert!(err.to_string().contains("/nonexistent/sim.yaml"));
    }
}
