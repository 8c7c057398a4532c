//! SecretAuthGate: verifies caller credentials against stored chat users.

use std::sync::Arc;

use parley_types::chat::ChatUser;
use parley_types::error::{AuthError, RepositoryError};
use parley_types::language::Language;
use uuid::Uuid;

use super::credentials::Credentials;
use super::hasher::SecretHasher;
use crate::repository::conversation::ConversationRepository;

/// A caller whose secret has been verified.
///
/// Only [`SecretAuthGate::authenticate`] produces this value; the rest of the
/// pipeline receives it by parameter.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    user: ChatUser,
}

impl AuthenticatedUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn language(&self) -> Language {
        self.user.language
    }
}

/// Verifies identity/secret pairs. Read-only: never writes to the store.
pub struct SecretAuthGate<R: ConversationRepository, H: SecretHasher> {
    repo: Arc<R>,
    hasher: Arc<H>,
}

impl<R: ConversationRepository, H: SecretHasher> SecretAuthGate<R, H> {
    pub fn new(repo: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repo, hasher }
    }

    /// Look up the identity and verify the secret against its stored hash.
    ///
    /// Identities that are not valid UUIDs cannot exist, so they report
    /// `NotFound` like any other unknown identity.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticatedUser, AuthError> {
        let id = Uuid::parse_str(credentials.identity()).map_err(|_| AuthError::NotFound)?;

        let user = match self.repo.get_user(&id).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound) => return Err(AuthError::NotFound),
            Err(e) => return Err(AuthError::Unavailable(e.to_string())),
        };

        if !self
            .hasher
            .verify_secret(credentials.secret(), &user.secret_hash)
            .await?
        {
            tracing::debug!(chat_user_id = %id, "secret mismatch");
            return Err(AuthError::Mismatch);
        }

        Ok(AuthenticatedUser { user })
    }
}
