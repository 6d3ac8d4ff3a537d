//! Maintenance Rotation & Lifecycle Engine
//!
//! The engine owns the cross-entity invariants: the per-owner rotation order,
//! the one-pending-visit-per-plant rule, and the atomic multi-entity
//! transition that runs on visit creation and completion. Rendering,
//! authentication, and storage internals are collaborators.

pub mod catalog;
pub mod lifecycle;
pub mod sequencer;
pub mod tracker;
