//! HTTP layer for Parley.
//!
//! Axum routes under `/chat/` with Basic credentials on the answer and end
//! endpoints, envelope response format, and configurable CORS.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
