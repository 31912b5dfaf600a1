#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A behavior offered for one tick, optionally bound to the object offering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Advertised<O, B> {
    pub object: Option<O>,
    pub behavior: B,
}

impl<O, B> Advertised<O, B> {
    /// Offered by an object.
    pub fn on(object: O, behavior: B) -> Self {
        Self {
            object: Some(object),
            behavior,
        }
    }

    /// Offered by the world itself, with no target.
    pub fn fallback(behavior: B) -> Self {
        Self {
            object: None,
            behavior,
        }
    }
}
