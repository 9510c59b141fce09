//! Repository layer over the notebook tree.
//!
//! # Responsibility
//! - Define use-case oriented add/lookup contracts.
//! - Isolate file persistence details from service orchestration.
//!
//! # Invariants
//! - Every successful write is durable before the call returns.
//! - Lookups return semantic outcomes (`TopicNotFound`, `Empty`) instead of
//!   errors.

pub mod note_repo;
