//! SecretHasher trait for generating and verifying chat user secrets.
//!
//! Defined in parley-core so the auth gate and orchestrator can work with
//! secrets without coupling to a specific algorithm. The Argon2 adapter
//! lives in parley-infra.

use parley_types::error::AuthError;

/// Abstraction over secret generation and one-way hashing.
///
/// Hashing and verification are async: a real KDF is CPU-bound and must not
/// run on the request's executor thread.
pub trait SecretHasher: Send + Sync {
    /// Generate a fresh random plaintext secret.
    fn generate_secret(&self) -> String;

    /// Hash a plaintext secret with a random salt.
    fn hash_secret(
        &self,
        secret: &str,
    ) -> impl std::future::Future<Output = Result<String, AuthError>> + Send;

    /// Check a plaintext secret against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only when the hash itself is
    /// unusable.
    fn verify_secret(
        &self,
        secret: &str,
        hash: &str,
    ) -> impl std::future::Future<Output = Result<bool, AuthError>> + Send;
}
