//! SQLite storage for chat users and conversation turns.

pub mod conversation;
pub mod pool;
