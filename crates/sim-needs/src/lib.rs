//! Needs model: each need drifts every tick, is clamped to its range and maps onto a happiness
//! penalty through a curve.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod curve;
pub mod def;
pub mod error;
pub mod needs;
pub mod rolling;

pub use catalog::{NeedCatalog, NeedId};
pub use curve::HappinessCurve;
pub use def::{NeedCategory, NeedDef};
pub use error::NeedsError;
pub use needs::Needs;
pub use rolling::RollingAverage;
