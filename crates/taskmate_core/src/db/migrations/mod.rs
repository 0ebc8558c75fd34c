//! Versioned schema scripts for the task store.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one per script.
//! - All pending scripts run inside one transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

/// (version, name, script)
type Migration = (u32, &'static str, &'static str);

const MIGRATIONS: [Migration; 2] = [
    (1, "tasks_and_subtasks", include_str!("0001_init.sql")),
    (2, "task_tags", include_str!("0002_tags.sql")),
];

/// Returns the schema version this binary migrates up to.
pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Reads the schema version recorded in the store.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Runs every script newer than the recorded schema version.
///
/// # Errors
/// - `SchemaTooNew` when the store is ahead of this binary.
/// - `Migration` naming the script that failed; nothing is applied then.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending = MIGRATIONS
        .iter()
        .filter(|(version, _, _)| *version > found)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &&(version, name, script) in &pending {
        run_script(&tx, version, script).map_err(|source| DbError::Migration {
            version,
            name,
            source,
        })?;
        info!("event=db_migrate module=db status=ok version={version} name={name}");
    }
    tx.commit()?;
    Ok(())
}

fn run_script(tx: &Transaction<'_>, version: u32, script: &str) -> rusqlite::Result<()> {
    tx.execute_batch(script)?;
    tx.pragma_update(None, "user_version", version)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, MIGRATIONS};

    #[test]
    fn versions_are_contiguous_from_one() {
        for (index, (version, _, _)) in MIGRATIONS.iter().enumerate() {
            assert_eq!(*version as usize, index + 1);
        }
        assert_eq!(latest_version(), 2);
    }
}
