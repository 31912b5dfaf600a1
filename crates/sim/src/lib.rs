//! Umbrella crate that re-exports the `sim-*` building blocks.
//!
//! Most hosts only need [`agent::Simulation`]; the lower layers are exposed for custom scripts,
//! alternative grid backends and inspection.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use sim_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use sim_tools as tools;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use sim_bt as bt;

#[cfg(feature = "nav")]
#[cfg_attr(docsrs, doc(cfg(feature = "nav")))]
pub use sim_nav as nav;

#[cfg(feature = "needs")]
#[cfg_attr(docsrs, doc(cfg(feature = "needs")))]
pub use sim_needs as needs;

#[cfg(feature = "claims")]
#[cfg_attr(docsrs, doc(cfg(feature = "claims")))]
pub use sim_claims as claims;

#[cfg(feature = "utility")]
#[cfg_attr(docsrs, doc(cfg(feature = "utility")))]
pub use sim_utility as utility;

#[cfg(feature = "agent")]
#[cfg_attr(docsrs, doc(cfg(feature = "agent")))]
pub use sim_agent as agent;
