//! Infrastructure layer for Parley.
//!
//! Contains implementations of the ports defined in `parley-core`:
//! SQLite conversation storage, Argon2 secret hashing, the OpenAI and
//! ElevenLabs voice providers, and the configuration loader.

pub mod config;
pub mod crypto;
pub mod sqlite;
pub mod voice;
