//! Deterministic, engine-agnostic kernel primitives for the tile-grid agent simulation.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod agent;
pub mod arena;
pub mod blackboard;
pub mod error;
pub mod rng;
pub mod symbol;
pub mod tick;
pub mod world;

pub use action::{Action, ActionStatus};
pub use agent::AgentId;
pub use arena::{Arena, Id};
pub use blackboard::{BbKey, Blackboard};
pub use error::{SimError, SimResult};
pub use rng::{DeterministicRng, SplitMix64};
pub use symbol::{Symbol, SymbolTable};
pub use tick::TickContext;
pub use world::{WorldMut, WorldView};
