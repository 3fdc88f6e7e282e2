//! Session bootstrap for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory connections from a [`DbConfig`].
//! - Configure connection pragmas and busy timeout.
//! - Bring the schema up to date before returning a usable session.
//!
//! # Invariants
//! - Returned sessions have the pets table in place.
//! - Storage failures are propagated once, never retried.

use super::migrations::apply_migrations;
use super::session::Session;
use super::{DbConfig, DbLocation, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens the session described by `config`, creating file and table on first run.
///
/// # Side effects
/// - Creates the database file if it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open(config: &DbConfig) -> DbResult<Session> {
    let started_at = Instant::now();
    let mode = config.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let connection = match &config.location {
        DbLocation::File(path) => Connection::open(path),
        DbLocation::Memory => Connection::open_in_memory(),
    };
    let mut conn = match connection {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, config.busy_timeout) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(Session::new(conn))
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a file-backed session with default settings.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Session> {
    open(&DbConfig::file(path))
}

/// Opens an in-memory session with default settings.
pub fn open_db_in_memory() -> DbResult<Session> {
    open(&DbConfig::in_memory())
}

fn bootstrap_connection(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.busy_timeout(busy_timeout)?;
    apply_migrations(conn)?;
    Ok(())
}
