//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the parcel tracker.
//! - Bring the `parcel` schema up to date before handing out a connection.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer binary is refused, never downgraded.
//! - A `parcel` table not created by these migrations is refused, never
//!   adopted, so the status `CHECK` constraint always holds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, configuring or migrating the backing store.
#[derive(Debug)]
pub enum DbError {
    /// Driver-level failure (I/O, constraint, malformed statement).
    Sqlite(rusqlite::Error),
    /// A schema migration could not be applied; the tracker database is left
    /// at its previous version.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The database schema is newer than this binary understands.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "parcel database error: {err}"),
            Self::Migration { version, source } => write!(
                f,
                "parcel schema migration {version} failed (is this an older tracker database?): {source}"
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "tracker database schema version {db_version} is newer than this build supports ({latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Migration { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
