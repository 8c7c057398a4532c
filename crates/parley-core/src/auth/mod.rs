//! Caller authentication: credential parsing, secret hashing port, and the
//! gate that verifies a caller against stored chat users.

pub mod credentials;
pub mod gate;
pub mod hasher;

pub use credentials::Credentials;
pub use gate::{AuthenticatedUser, SecretAuthGate};
pub use hasher::SecretHasher;
