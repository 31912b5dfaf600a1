use thiserror::Error;

/// Tree construction errors. These surface at startup, when scripts are registered, never while
/// the simulation is ticking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("{kind} expects {expected} children, got {got}")]
    InvalidChildCount {
        kind: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("{kind} needs a count of at least 1")]
    ZeroCount { kind: &'static str },

    #[error("script `{0}` is not registered")]
    UnknownScript(String),

    #[error("script `{0}` is already registered")]
    DuplicateScript(String),
}
