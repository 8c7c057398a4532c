//! SQLite pools for the conversation store.
//!
//! Turns are appended in multi-row transactions, so all writes go through a
//! single-connection writer pool. Reads (auth lookups and history loads) use
//! a separate read-only pool. Both run in WAL mode with foreign keys on, so
//! a reader never observes half of an appended batch.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use parley_types::config::DatabaseConfig;

/// Reader and writer pools over one database file.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (or create) the database described by `config` and apply
    /// pending migrations.
    ///
    /// Missing parent directories of the database file are created.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let path = Path::new(&config.path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let base_opts = SqliteConnectOptions::new()
            .filename(path)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(base_opts.clone())
            .await?;

        // Reader connections are read-only, so the schema must exist first.
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(config.max_readers.max(1))
            .connect_with(base_opts.read_only(true))
            .await?;

        tracing::debug!(
            path = %config.path,
            max_readers = config.max_readers,
            "conversation store ready"
        );

        Ok(Self { reader, writer })
    }
}
