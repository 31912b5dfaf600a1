//! Behavior and exercise definitions, resolved once against the need catalog and the script
//! registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sim_bt::{ScriptId, ScriptRegistry};
use sim_core::{SimError, SimResult, Symbol, SymbolTable};
use sim_needs::{NeedCatalog, NeedId};

use crate::config::SimConfig;
use crate::scripts;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedModifier {
    pub need: String,
    pub per_tick: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDef {
    pub name: String,
    pub duration_ticks: u32,
    #[serde(default)]
    pub modifiers: Vec<NeedModifier>,
}

/// What a behavior does to the agent; drives both scoring and the script parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorKind {
    Leave,
    Wander,
    CheckIn,
    StaffReception,
    UseFixture {
        need: String,
        per_tick: i32,
        until: i32,
    },
    Exercise {
        exercise: String,
    },
    RackedExercise {
        exercise: String,
    },
    Drink {
        need: String,
        per_tick: i32,
        until: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorDef {
    pub name: String,
    /// Registered script that runs this behavior.
    pub script: String,
    #[serde(flatten)]
    pub kind: BehaviorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BehaviorId(u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExerciseId(u16);

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub duration_ticks: u32,
    pub modifiers: Vec<(NeedId, i32)>,
}

/// `BehaviorKind` with names resolved to handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Leave,
    Wander,
    CheckIn,
    StaffReception,
    UseFixture {
        need: NeedId,
        per_tick: i32,
        until: i32,
    },
    Exercise(ExerciseId),
    RackedExercise(ExerciseId),
    Drink {
        need: NeedId,
        per_tick: i32,
        until: i32,
    },
}

#[derive(Debug, Clone)]
pub struct Behavior {
    pub name: String,
    pub symbol: Symbol,
    pub script: ScriptId,
    pub effect: Effect,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    needs: NeedCatalog,
    exercises: Vec<Exercise>,
    behaviors: Vec<Behavior>,
    by_symbol: BTreeMap<Symbol, BehaviorId>,
    leave: BehaviorId,
    wander: BehaviorId,
}

impl Catalog {
    pub fn build(
        config: &SimConfig,
        symbols: &mut SymbolTable,
        scripts: &ScriptRegistry<World>,
    ) -> SimResult<Self> {
        let needs = NeedCatalog::from_defs(config.needs.clone(), symbols)
            .map_err(|err| SimError::Config(err.to_string()))?;

        let need = |symbols: &SymbolTable, name: &str| {
            needs
                .id_by_name(symbols, name)
                .map_err(|_| SimError::UnknownNeed(name.to_string()))
        };

        let mut exercises = Vec::with_capacity(config.exercises.len());
        let mut exercise_ids = BTreeMap::new();
        for def in &config.exercises {
            let modifiers = def
                .modifiers
                .iter()
                .map(|m| need(&*symbols, &m.need).map(|id| (id, m.per_tick)))
                .collect::<SimResult<Vec<_>>>()?;
            exercise_ids.insert(def.name.clone(), ExerciseId(exercises.len() as u16));
            exercises.push(Exercise {
                name: def.name.clone(),
                duration_ticks: def.duration_ticks,
                modifiers,
            });
        }
        let exercise = |name: &str| {
            exercise_ids
                .get(name)
                .copied()
                .ok_or_else(|| SimError::Config(format!("unknown exercise `{name}`")))
        };

        let mut behaviors = Vec::with_capacity(config.behaviors.len());
        let mut by_symbol = BTreeMap::new();
        for def in &config.behaviors {
            let script = scripts
                .lookup(&def.script)
                .ok_or_else(|| SimError::UnknownScript(def.script.clone()))?;
            let effect = match &def.kind {
                BehaviorKind::Leave => Effect::Leave,
                BehaviorKind::Wander => Effect::Wander,
                BehaviorKind::CheckIn => Effect::CheckIn,
                BehaviorKind::StaffReception => Effect::StaffReception,
                BehaviorKind::UseFixture {
                    need: name,
                    per_tick,
                    until,
                } => Effect::UseFixture {
                    need: need(&*symbols, name)?,
                    per_tick: *per_tick,
                    until: *until,
                },
                BehaviorKind::Exercise { exercise: name } => Effect::Exercise(exercise(name)?),
                BehaviorKind::RackedExercise { exercise: name } => {
                    Effect::RackedExercise(exercise(name)?)
                }
                BehaviorKind::Drink {
                    need: name,
                    per_tick,
                    until,
                } => Effect::Drink {
                    need: need(&*symbols, name)?,
                    per_tick: *per_tick,
                    until: *until,
                },
            };

            if !scripts::accepts(&def.script, &effect) {
                return Err(SimError::Config(format!(
                    "behavior `{}` cannot run on script `{}`",
                    def.name, def.script
                )));
            }

            let symbol = symbols.intern(&def.name);
            let id = BehaviorId(behaviors.len() as u16);
            if by_symbol.insert(symbol, id).is_some() {
                return Err(SimError::Config(format!(
                    "behavior `{}` is defined twice",
                    def.name
                )));
            }
            behaviors.push(Behavior {
                name: def.name.clone(),
                symbol,
                script,
                effect,
            });
        }

        let first = |wanted: Effect| {
            behaviors
                .iter()
                .position(|b| b.effect == wanted)
                .map(|i| BehaviorId(i as u16))
        };
        let leave = first(Effect::Leave)
            .ok_or_else(|| SimError::Config("no behavior of kind `leave`".to_string()))?;
        let wander = first(Effect::Wander)
            .ok_or_else(|| SimError::Config("no behavior of kind `wander`".to_string()))?;

        tracing::debug!(
            needs = needs.len(),
            exercises = exercises.len(),
            behaviors = behaviors.len(),
            "catalog resolved"
        );
        Ok(Self {
            needs,
            exercises,
            behaviors,
            by_symbol,
            leave,
            wander,
        })
    }

    pub fn needs(&self) -> &NeedCatalog {
        &self.needs
    }

    /// Panics for an id minted by another catalog.
    pub fn behavior(&self, id: BehaviorId) -> &Behavior {
        self.behaviors
            .get(id.0 as usize)
            .unwrap_or_else(|| panic!("unknown behavior id {}", id.0))
    }

    pub fn exercise(&self, id: ExerciseId) -> &Exercise {
        self.exercises
            .get(id.0 as usize)
            .unwrap_or_else(|| panic!("unknown exercise id {}", id.0))
    }

    pub fn behavior_id(&self, symbols: &SymbolTable, name: &str) -> SimResult<BehaviorId> {
        symbols
            .get(name)
            .and_then(|symbol| self.by_symbol.get(&symbol).copied())
            .ok_or_else(|| SimError::UnknownBehavior(name.to_string()))
    }

    /// The static fallbacks every agent is offered first.
    pub fn fallbacks(&self) -> [BehaviorId; 2] {
        [self.leave, self.wander]
    }

    /// Needs a behavior brings down.
    pub fn reduces(&self, id: BehaviorId) -> Vec<NeedId> {
        match self.behavior(id).effect {
            Effect::UseFixture { need, per_tick, .. } | Effect::Drink { need, per_tick, .. }
                if per_tick < 0 =>
            {
                vec![need]
            }
            Effect::Exercise(exercise) | Effect::RackedExercise(exercise) => self
                .exercise(exercise)
                .modifiers
                .iter()
                .filter(|(_, per_tick)| *per_tick < 0)
                .map(|(need, _)| *need)
                .collect(),
            _ => Vec::new(),
        }
    }
}
