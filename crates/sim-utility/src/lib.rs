//! Utility selection primitives.
//!
//! Each candidate gets a score; the strictly greatest score wins and ties keep the first
//! candidate seen, so selection is stable by candidate order.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod advertised;
pub mod score;
pub mod selector;

pub use advertised::Advertised;
pub use score::{distance_penalty, queue_penalty, Utility};
pub use selector::{UtilitySelector, UtilitySelectorConfig};
