//! Forward-only schema migrations keyed on `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::info;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Ordered migration steps. Step `n` brings the schema from `n - 1` to `n`.
const STEPS: &[(u32, &str)] = &[(1, schema::SCHEMA_V1)];

/// Schema version recorded in the database file.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Apply every step newer than the stored version, each in its own
/// transaction together with its version bump.
pub fn run(conn: &Connection) -> Result<()> {
    let stored = schema_version(conn)?;
    if stored > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "database schema v{stored} is newer than supported v{SCHEMA_VERSION}"
        )));
    }

    for &(version, sql) in STEPS.iter().filter(|(v, _)| *v > stored) {
        info!("Migrating contact store to schema v{version}");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
    }

    let reached = schema_version(conn)?;
    if reached != SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "no migration path from v{reached} to v{SCHEMA_VERSION}"
        )));
    }
    Ok(())
}
