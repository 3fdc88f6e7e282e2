//! SQLite storage session for the pet catalog.
//!
//! # Responsibility
//! - Open and configure the single-table shelter database.
//! - Create the pets table on first open and track the schema version.
//! - Expose thin query/insert/update/delete primitives to the gateway.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No pet data is read or written before the schema is in place.
//! - Table and column identifiers are checked before being spliced into SQL;
//!   values are always bound as parameters.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod migrations;
mod bootstrap;
mod session;

pub use bootstrap::{open, open_db, open_db_in_memory};
pub use session::{Selection, Session};

/// File name of the shelter database inside the data directory.
pub const DATABASE_NAME: &str = "shelter.db";

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    InvalidIdentifier(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidIdentifier(name) => write!(f, "invalid SQL identifier `{name}`"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::InvalidIdentifier(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

/// Storage session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub location: DbLocation,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl DbConfig {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            location: DbLocation::File(path.as_ref().to_path_buf()),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Places [`DATABASE_NAME`] inside `dir`.
    pub fn in_data_dir(dir: impl AsRef<Path>) -> Self {
        Self::file(dir.as_ref().join(DATABASE_NAME))
    }

    pub fn in_memory() -> Self {
        Self {
            location: DbLocation::Memory,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    fn mode(&self) -> &'static str {
        match self.location {
            DbLocation::File(_) => "file",
            DbLocation::Memory => "memory",
        }
    }
}

/// Rejects anything but `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn check_identifier(name: &str) -> DbResult<&str> {
    let mut bytes = name.bytes();
    let valid = match bytes.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == b'_')
                && bytes.all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
        }
        None => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(DbError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{check_identifier, DbConfig, DbLocation, DATABASE_NAME};
    use std::path::Path;

    #[test]
    fn data_dir_config_points_at_shelter_db() {
        let config = DbConfig::in_data_dir("/tmp/pets");
        assert_eq!(
            config.location,
            DbLocation::File(Path::new("/tmp/pets").join(DATABASE_NAME))
        );
        assert_eq!(config.mode(), "file");
        assert_eq!(DbConfig::in_memory().mode(), "memory");
    }

    #[test]
    fn identifier_check_rejects_sql_fragments() {
        assert!(check_identifier("pets").is_ok());
        assert!(check_identifier("_id2").is_ok());
        assert!(check_identifier("").is_err());
        assert!(check_identifier("2pets").is_err());
        assert!(check_identifier("name; DROP TABLE pets").is_err());
        assert!(check_identifier("name\"").is_err());
    }
}
