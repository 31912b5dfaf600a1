//! Shared error taxonomy.
//!
//! Expected negative simulation outcomes (slot full, no route) are plain data (`Option`,
//! `ActionStatus::Failed`, BT `Failure`). This type covers lookups that failed and startup-time
//! problems the caller should surface; subsystem crates keep their own error enums and convert.

use thiserror::Error;

use crate::Id;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("agent {0} not found")]
    AgentNotFound(Id),

    #[error("object {0} not found")]
    ObjectNotFound(Id),

    #[error("unknown behavior `{0}`")]
    UnknownBehavior(String),

    #[error("unknown need `{0}`")]
    UnknownNeed(String),

    #[error("unknown behavior script `{0}`")]
    UnknownScript(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type SimResult<T> = Result<T, SimError>;
