//! ConversationRepository trait definition.
//!
//! Owns chat users and their append-only turn history.

use parley_types::chat::{ChatUser, NewChatUser, NewTurn, Turn};
use parley_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat users and conversation turns.
///
/// Implementations live in parley-infra (e.g., `SqliteConversationRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Multi-turn writes are all-or-nothing: either every turn of a batch
/// becomes visible or none does.
pub trait ConversationRepository: Send + Sync {
    /// Create a chat user. The store assigns id and creation time.
    fn create_user(
        &self,
        user: &NewChatUser,
    ) -> impl std::future::Future<Output = Result<ChatUser, RepositoryError>> + Send;

    /// Create a chat user and append its opening turns in one unit of work.
    fn start_conversation(
        &self,
        user: &NewChatUser,
        turns: &[NewTurn],
    ) -> impl std::future::Future<Output = Result<(ChatUser, Vec<Turn>), RepositoryError>> + Send;

    /// Append a batch of turns to an existing conversation.
    ///
    /// Fails without persisting anything if the user does not exist or any
    /// single insert fails.
    fn append_turns(
        &self,
        chat_user_id: &Uuid,
        turns: &[NewTurn],
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, RepositoryError>> + Send;

    /// Get a chat user by id. Returns `RepositoryError::NotFound` if absent.
    fn get_user(
        &self,
        chat_user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<ChatUser, RepositoryError>> + Send;

    /// Full turn history in insertion order (empty if none).
    fn get_turns(
        &self,
        chat_user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, RepositoryError>> + Send;
}
