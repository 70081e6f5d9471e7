//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `expenses` - Expense inserts and range queries
//! - `reports` - Monthly summaries and month comparisons

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{Error, Result};

mod expenses;
mod reports;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a stored `YYYY-MM-DD` date
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::InvalidData(format!("Invalid stored date: {}", s)))
}

/// Resolve a database URL to a SQLite file path
///
/// Accepts `sqlite:///<path>` or a plain file path. The path is everything
/// after the third slash, so `sqlite:///data.db` is the relative path
/// `data.db` and `sqlite:////tmp/x.db` is the absolute path `/tmp/x.db`.
pub fn sqlite_path_from_url(url: &str) -> Result<String> {
    let url = url.trim();
    if let Some(path) = url.strip_prefix("sqlite:///") {
        if path.is_empty() {
            return Err(Error::Config("DATABASE_URL has no database path".into()));
        }
        return Ok(path.to_string());
    }
    if url.is_empty() {
        return Err(Error::Config("DATABASE_URL is empty".into()));
    }
    if url.contains("://") {
        return Err(Error::Config(format!(
            "Unsupported database URL '{}' (expected sqlite:///<path>)",
            url
        )));
    }
    Ok(url.to_string())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file (`:memory:` for in-memory databases)
    db_path: String,
}

impl Database {
    /// Open (and create if needed) the SQLite database at `path`
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Open the database named by a `DATABASE_URL`-style string
    pub fn from_url(url: &str) -> Result<Self> {
        Self::new(&sqlite_path_from_url(url)?)
    }

    /// Create an in-memory database (for testing)
    ///
    /// Every pooled connection to `:memory:` would open its own empty
    /// database, so the pool is pinned to a single long-lived connection.
    pub fn in_memory() -> Result<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(SqliteConnectionManager::memory())?;

        let db = Self {
            pool,
            db_path: ":memory:".to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            -- Note: creates -wal and -shm sidecar files alongside the database
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Expenses (append-only)
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL CHECK (user_id <> ''),
                amount REAL NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL DEFAULT 'uncategorized',
                date DATE NOT NULL,                        -- YYYY-MM-DD
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses(user_id, date);
            "#,
        )?;

        info!(path = %self.db_path, "Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
