//! Schema creation and version bookkeeping.
//!
//! # Responsibility
//! - Create the pets table on a fresh database.
//! - Route older schema versions through [`migrate`].
//!
//! # Invariants
//! - Applied version is mirrored to `PRAGMA user_version`.
//! - A database newer than [`DATABASE_VERSION`] is never opened.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema version written by this binary.
pub const DATABASE_VERSION: u32 = 1;

const CREATE_PETS_SQL: &str = include_str!("0001_init.sql");

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    DATABASE_VERSION
}

/// Creates the schema on first open, or upgrades an older one.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > DATABASE_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: DATABASE_VERSION,
        });
    }

    if current_version == DATABASE_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    if current_version == 0 {
        tx.execute_batch(CREATE_PETS_SQL)?;
        info!("event=db_schema module=db status=created version={DATABASE_VERSION}");
    } else {
        migrate(&tx, current_version, DATABASE_VERSION)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {DATABASE_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

/// Upgrade hook from `from` to `to`.
///
/// No migrations exist yet: this only records the version change. Any future
/// schema change must add its steps here.
pub fn migrate(_conn: &Connection, from: u32, to: u32) -> DbResult<()> {
    info!("event=db_migrate module=db status=noop from={from} to={to}");
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
