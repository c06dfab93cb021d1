//! Pooled SQLite store backing the durable kv values and the capped
//! event log.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use thiserror::Error;

pub type DbConn = PooledConnection<SqliteConnectionManager>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) the store at `database_url`. `:memory:` is
    /// supported for tests.
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        let manager = if database_url == ":memory:" {
            SqliteConnectionManager::memory()
        } else {
            if let Some(parent) = std::path::Path::new(database_url).parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            SqliteConnectionManager::file(database_url)
        };

        // A single connection keeps `:memory:` databases coherent across
        // the pool; the engine's write rate never needs more.
        let pool = Pool::builder().max_size(1).build(manager)?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    pub fn conn(&self) -> DbConn {
        self.pool.get().expect("db connection pool exhausted")
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS durable_kv (
                name       TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS stored_events (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                event_name TEXT NOT NULL,
                payload    TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}
