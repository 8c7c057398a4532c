//! Cryptographic operations for Parley.
//!
//! - `secret`: Argon2id hashing and random generation of chat user secrets

pub mod secret;
