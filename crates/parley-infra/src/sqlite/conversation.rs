//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `parley-core` using sqlx with split
//! read/write pools. Multi-turn writes run inside one transaction on the
//! single-connection writer pool, so a batch is either fully visible or not
//! at all.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use parley_core::repository::conversation::ConversationRepository;
use parley_types::chat::{ChatUser, NewChatUser, NewTurn, Turn, TurnRole};
use parley_types::error::RepositoryError;
use parley_types::language::Language;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatUserRow {
    id: String,
    secret_hash: String,
    language: String,
    created_at: String,
}

impl ChatUserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            secret_hash: row.try_get("secret_hash")?,
            language: row.try_get("language")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<ChatUser, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat user id: {e}")))?;
        let language: Language = self
            .language
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatUser {
            id,
            secret_hash: self.secret_hash,
            language,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct TurnRow {
    id: String,
    chat_user_id: String,
    role: String,
    text: String,
    audio: Option<String>,
    ssml: Option<String>,
    created_at: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_user_id: row.try_get("chat_user_id")?,
            role: row.try_get("role")?,
            text: row.try_get("text")?,
            audio: row.try_get("audio")?,
            ssml: row.try_get("ssml")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<Turn, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid turn id: {e}")))?;
        let chat_user_id = Uuid::parse_str(&self.chat_user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat_user_id: {e}")))?;
        let role: TurnRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Turn {
            id,
            chat_user_id,
            role,
            text: self.text,
            audio: self.audio,
            ssml: self.ssml,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

async fn insert_user(
    conn: &mut SqliteConnection,
    user: &NewChatUser,
) -> Result<ChatUser, RepositoryError> {
    let created = ChatUser {
        id: Uuid::now_v7(),
        secret_hash: user.secret_hash.clone(),
        language: user.language,
        created_at: Utc::now(),
    };

    sqlx::query("INSERT INTO chat_users (id, secret_hash, language, created_at) VALUES (?, ?, ?, ?)")
        .bind(created.id.to_string())
        .bind(&created.secret_hash)
        .bind(created.language.code())
        .bind(format_datetime(&created.created_at))
        .execute(&mut *conn)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(created)
}

async fn insert_turns(
    conn: &mut SqliteConnection,
    chat_user_id: Uuid,
    turns: &[NewTurn],
) -> Result<Vec<Turn>, RepositoryError> {
    let mut created = Vec::with_capacity(turns.len());

    for turn in turns {
        let row = Turn {
            id: Uuid::now_v7(),
            chat_user_id,
            role: turn.role,
            text: turn.text.clone(),
            audio: turn.audio.clone(),
            ssml: turn.ssml.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"INSERT INTO turns (id, chat_user_id, role, text, audio, ssml, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(row.id.to_string())
        .bind(chat_user_id.to_string())
        .bind(row.role.to_string())
        .bind(&row.text)
        .bind(&row.audio)
        .bind(&row.ssml)
        .bind(format_datetime(&row.created_at))
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("FOREIGN KEY") {
                    return RepositoryError::Conflict(format!(
                        "chat user {chat_user_id} does not exist"
                    ));
                }
            }
            RepositoryError::Query(e.to_string())
        })?;

        created.push(row);
    }

    Ok(created)
}

// ---------------------------------------------------------------------------
// ConversationRepository implementation
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn create_user(&self, user: &NewChatUser) -> Result<ChatUser, RepositoryError> {
        let mut conn = self
            .pool
            .writer
            .acquire()
            .await
            .map_err(|_| RepositoryError::Connection)?;
        insert_user(&mut conn, user).await
    }

    async fn start_conversation(
        &self,
        user: &NewChatUser,
        turns: &[NewTurn],
    ) -> Result<(ChatUser, Vec<Turn>), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let created_user = insert_user(&mut tx, user).await?;
        let created_turns = insert_turns(&mut tx, created_user.id, turns).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok((created_user, created_turns))
    }

    async fn append_turns(
        &self,
        chat_user_id: &Uuid,
        turns: &[NewTurn],
    ) -> Result<Vec<Turn>, RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // Dropping `tx` on the error path rolls the whole batch back.
        let created = insert_turns(&mut tx, *chat_user_id, turns).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(created)
    }

    async fn get_user(&self, chat_user_id: &Uuid) -> Result<ChatUser, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_users WHERE id = ?")
            .bind(chat_user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    ChatUserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                user_row.into_user()
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn get_turns(&self, chat_user_id: &Uuid) -> Result<Vec<Turn>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM turns WHERE chat_user_id = ? ORDER BY seq ASC")
            .bind(chat_user_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row = TurnRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }

        Ok(turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        let config = parley_types::config::DatabaseConfig {
            path: db_path.display().to_string(),
            ..Default::default()
        };
        DatabasePool::open(&config).await.unwrap()
    }

    fn new_user(language: Language) -> NewChatUser {
        NewChatUser {
            secret_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            language,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = SqliteConversationRepository::new(test_pool().await);

        let created = repo.create_user(&new_user(Language::Indonesian)).await.unwrap();
        let fetched = repo.get_user(&created.id).await.unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.secret_hash, created.secret_hash);
        assert_eq!(fetched.language, Language::Indonesian);
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_not_found() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let err = repo.get_user(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_start_conversation_persists_user_and_turns() {
        let repo = SqliteConversationRepository::new(test_pool().await);

        let (user, turns) = repo
            .start_conversation(
                &new_user(Language::English),
                &[
                    NewTurn::system("You are an interviewer."),
                    NewTurn::assistant("Hello!", Some("UklGRg==".to_string()), None),
                ],
            )
            .await
            .unwrap();

        assert_eq!(turns.len(), 2);
        let stored = repo.get_turns(&user.id).await.unwrap();
        assert_eq!(stored, turns);
        assert_eq!(stored[1].audio.as_deref(), Some("UklGRg=="));
    }

    #[tokio::test]
    async fn test_append_then_read_preserves_call_order() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let user = repo.create_user(&new_user(Language::English)).await.unwrap();

        let first = repo
            .append_turns(&user.id, &[NewTurn::system("sys"), NewTurn::assistant("hi", None, None)])
            .await
            .unwrap();
        let second = repo
            .append_turns(
                &user.id,
                &[
                    NewTurn::user("answer"),
                    NewTurn::assistant("next", None, Some("<speak>next</speak>".to_string())),
                ],
            )
            .await
            .unwrap();

        let stored = repo.get_turns(&user.id).await.unwrap();
        let expected: Vec<Turn> = first.into_iter().chain(second).collect();
        assert_eq!(stored, expected);

        let texts: Vec<&str> = stored.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["sys", "hi", "answer", "next"]);
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_conversation_unchanged() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let user = repo.create_user(&new_user(Language::English)).await.unwrap();
        repo.append_turns(&user.id, &[NewTurn::system("sys"), NewTurn::assistant("hi", None, None)])
            .await
            .unwrap();

        sqlx::query(
            "CREATE TRIGGER fail_second_turn BEFORE INSERT ON turns
             WHEN NEW.text = 'boom'
             BEGIN SELECT RAISE(ABORT, 'forced failure'); END",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        let err = repo
            .append_turns(
                &user.id,
                &[NewTurn::user("fine"), NewTurn::assistant("boom", None, None)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));

        let stored = repo.get_turns(&user.id).await.unwrap();
        let texts: Vec<&str> = stored.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["sys", "hi"]);
    }

    #[tokio::test]
    async fn test_append_to_unknown_user_persists_nothing() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let ghost = Uuid::now_v7();

        let err = repo
            .append_turns(&ghost, &[NewTurn::user("hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM turns")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_get_turns_for_unknown_user_is_empty() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        assert!(repo.get_turns(&Uuid::now_v7()).await.unwrap().is_empty());
    }
}
