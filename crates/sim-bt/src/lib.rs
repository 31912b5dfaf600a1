//! Behavior tree engine built on `sim-core`.
//!
//! Every node runs inside a [`Node`] lifecycle wrapper: `initialize` once per activation, `update`
//! on every tick while active and `terminate` exactly once when the node leaves the running state,
//! whether it finished on its own or was aborted through [`Node::request_terminate`].
//!
//! Trees are described declaratively with [`NodeSpec`], validated and registered per script name
//! in a [`ScriptRegistry`], and instantiated on demand as a [`BehaviorTree`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod composite;
pub mod decorator;
pub mod error;
pub mod leaf;
pub mod node;
pub mod registry;
pub mod spec;
pub mod tree;

pub use bt::{BtNode, BtStatus, Exit};
pub use composite::{All, IfThenElse, Parallel, ParallelPolicy, Selector, Sequence};
pub use decorator::{Inverter, Repeat, Retry, SubTree};
pub use error::BuildError;
pub use leaf::{Condition, RunAction, Task};
pub use node::{Node, NodeState};
pub use registry::{ScriptId, ScriptRegistry};
pub use spec::NodeSpec;
pub use tree::BehaviorTree;
