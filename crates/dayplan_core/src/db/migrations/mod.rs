//! Planner schema versions.
//!
//! Version 1 creates the task template table, version 2 the notification
//! log. `PRAGMA user_version` records the last applied step. Pending steps
//! share one transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_tasks.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_notifications.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the planner schema on `conn` up to `latest_version()`.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = supported_user_version(conn)?;
    let latest = latest_version();
    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

/// Verifies that `conn` has every known migration applied.
///
/// Repositories call this so they never run against a raw connection.
pub fn ensure_migrated(conn: &Connection) -> DbResult<()> {
    let current_version = supported_user_version(conn)?;
    let latest = latest_version();
    if current_version < latest {
        return Err(DbError::SchemaNotReady {
            db_version: current_version,
            expected: latest,
        });
    }
    Ok(())
}

// Rejects databases written by a newer planner build.
fn supported_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();
    if version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: version,
            latest_supported: latest,
        });
    }
    Ok(version)
}
