//! Agents living on a tile grid: the world model, action primitives, behavior scripts, the
//! per-agent brain and the tick scheduler.
//!
//! Each tick every agent, in id order, drifts its needs, picks a behavior through utility
//! scoring when it has nothing to do, and ticks the behavior on top of its stack. Behaviors are
//! behavior trees instantiated from registered scripts; they reserve interaction points through
//! claim slots and walk the grid with A*.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod actions;
pub mod agent;
pub mod brain;
pub mod catalog;
pub mod config;
pub mod instance;
pub mod keys;
pub mod object;
pub mod scoring;
pub mod scripts;
pub mod simulation;
pub mod snapshot;
pub mod world;

pub use actions::Primitive;
pub use agent::{AgentBody, Role};
pub use brain::Brain;
pub use catalog::{
    Behavior, BehaviorDef, BehaviorId, BehaviorKind, Catalog, Effect, Exercise, ExerciseDef,
    ExerciseId, NeedModifier,
};
pub use config::SimConfig;
pub use instance::BehaviorInstance;
pub use keys::{Scope, ACTIVE_SCOPE};
pub use object::{ObjectSpec, WorldObject};
pub use simulation::Simulation;
pub use snapshot::AgentSnapshot;
pub use world::{Offer, World};
