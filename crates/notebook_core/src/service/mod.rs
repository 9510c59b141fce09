//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and lookup calls into request-level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod notebook_service;
