//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the interview
//! backend: chat users, turns, languages, speech outputs, provider
//! capabilities, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod interview;
pub mod language;
pub mod voice;
