//! # contactbook-db
//!
//! Contact store: the single SQLite database at
//! `$CONTACTBOOK_DATA_DIR/contactbook.db`.
//!
//! ## Schema
//!
//! - WAL mode
//! - Foreign keys enforced; deleting a contact cascades to its methods
//! - All timestamps are Unix epoch seconds
//! - Schema version stored in `PRAGMA user_version`

pub mod migrations;
pub mod queries;
pub mod schema;
pub mod seed;

use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open (creating if needed) the contact database file and bring its
/// schema up to date.
pub fn open(path: &Path) -> Result<Connection> {
    prepare(Connection::open(path)?)
}

/// Private in-memory database with the current schema.
pub fn open_memory() -> Result<Connection> {
    prepare(Connection::open_in_memory()?)
}

/// Current wall-clock time in Unix epoch seconds.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn prepare(conn: Connection) -> Result<Connection> {
    // In-memory databases report "memory" and stay that way.
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    migrations::run(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory_is_migrated() {
        let conn = open_memory().expect("open in-memory db");
        assert_eq!(
            migrations::schema_version(&conn).expect("version"),
            SCHEMA_VERSION
        );
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_memory().expect("open");
        let fk: i32 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .expect("get foreign_keys");
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_open_file_reopens_without_migrating_again() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("contactbook.db");
        {
            let conn = open(&path).expect("first open");
            conn.execute(
                "INSERT INTO contacts (name, created_at, updated_at) VALUES ('Alice', 1, 1)",
                [],
            )
            .expect("insert");
        }
        let conn = open(&path).expect("second open");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }
}
