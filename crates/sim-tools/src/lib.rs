//! Inspection tooling for the simulation.
//!
//! Trace events are recorded into an agent's blackboard while it is ticked, so tests and
//! inspectors can read back exactly what a behavior did without hooking the engine.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink, TRACE_LOG, TRACE_SINK,
};
