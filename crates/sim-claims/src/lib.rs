//! Claim slots: a fixed number of exclusive reservations per interactable object.
//!
//! An agent holds at most one slot per array and no slot is ever held by two agents. Occupation
//! is first-come-first-served in whatever order callers ask.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod pools;
pub mod slots;

pub use pools::{ClaimGroup, ClaimPools};
pub use slots::ClaimSlots;
