//! Notebook domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by store, repository and service.
//!
//! # Invariants
//! - Topics exclusively own their notes; neither is ever deleted.

pub mod note;
