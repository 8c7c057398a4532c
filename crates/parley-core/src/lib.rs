//! Business logic and port trait definitions for Parley.
//!
//! This crate defines the "ports" (repository, hasher and voice provider
//! traits) that the infrastructure layer implements, plus the turn
//! orchestration pipeline built on top of them. It depends only on
//! `parley-types` -- never on `parley-infra` or any database/IO crate.

pub mod auth;
pub mod orchestrator;
pub mod prompt;
pub mod repository;
pub mod sanitize;
pub mod status;
pub mod voice;

#[cfg(test)]
pub(crate) mod testing;
