use crate::AgentId;

/// Read-only world access.
///
/// The kernel does not prescribe which queries a world must expose; subsystems (navigation,
/// claims, needs) define extension traits or concrete accessors of their own.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}
