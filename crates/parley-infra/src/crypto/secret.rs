//! Argon2id secret hashing for chat user credentials.
//!
//! Implements the `SecretHasher` trait from `parley-core` using the `argon2`
//! crate (RustCrypto ecosystem). Hashes are PHC strings carrying their own
//! salt and parameters; verification runs in constant time.
//!
//! The KDF runs on tokio's blocking pool so request tasks keep moving while
//! a hash is computed.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;

use parley_core::auth::SecretHasher;
use parley_types::error::AuthError;

/// Length of generated plaintext secrets.
pub const SECRET_LENGTH: usize = 32;

/// Argon2id implementation of `SecretHasher` with default parameters.
#[derive(Default)]
pub struct Argon2SecretHasher {
    argon2: Argon2<'static>,
}

impl Argon2SecretHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretHasher for Argon2SecretHasher {
    fn generate_secret(&self) -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(SECRET_LENGTH)
            .map(char::from)
            .collect()
    }

    async fn hash_secret(&self, secret: &str) -> Result<String, AuthError> {
        let argon2 = self.argon2.clone();
        let secret = secret.to_string();
        run_blocking(move || hash_with(&argon2, &secret)).await
    }

    async fn verify_secret(&self, secret: &str, hash: &str) -> Result<bool, AuthError> {
        let argon2 = self.argon2.clone();
        let secret = secret.to_string();
        let hash = hash.to_string();
        run_blocking(move || verify_with(&argon2, &secret, &hash)).await
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::Hashing(format!("hashing task failed: {e}")))?
}

fn hash_with(argon2: &Argon2<'_>, secret: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

fn verify_with(argon2: &Argon2<'_>, secret: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
    match argon2.verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hashing(e.to_string())),
    }
}
