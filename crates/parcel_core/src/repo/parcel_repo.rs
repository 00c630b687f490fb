//! Parcel repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Map the `Parcel` lifecycle onto statements against the `parcel` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Status gates for address changes and deletion are part of the mutating
//!   statement's filter, so check and mutate are one atomic statement.
//! - Zero affected rows is not an error for mutators; the affected-row count
//!   is returned so callers can detect a rejected mutation.
//! - Reads select `number, client, status, address, created_at` in that order
//!   and decode positionally.
//! - Reads reject unknown persisted status text instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use rusqlite::{named_params, Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_TABLE: &str = "parcel";
const PARCEL_COLUMNS: [&str; 5] = ["number", "client", "status", "address", "created_at"];
const PARCEL_SELECT_SQL: &str = "SELECT number, client, status, address, created_at FROM parcel";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for parcel persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Backing store failure; always surfaced, never recovered locally.
    Db(DbError),
    /// No parcel with this number exists.
    NotFound(ParcelNumber),
    /// The parcel exists but its status forbids the requested mutation.
    PreconditionFailed {
        number: ParcelNumber,
        status: ParcelStatus,
    },
    /// A stored row could not be decoded into a `Parcel`.
    InvalidData(String),
    /// The connection has not been migrated to the expected schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::PreconditionFailed { number, status } => write!(
                f,
                "parcel {number} is `{status}`; only `registered` parcels can be changed"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted parcel data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for parcel lifecycle operations.
pub trait ParcelRepository {
    /// Inserts a new parcel and returns its store-assigned number.
    ///
    /// `parcel.number` is ignored.
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber>;
    /// Loads one parcel; `RepoError::NotFound` when absent.
    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel>;
    /// Loads every parcel of `client`, ordered by number. Empty when none.
    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>>;
    /// Overwrites the status regardless of the current one.
    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<usize>;
    /// Overwrites the address only while the parcel is `registered`.
    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<usize>;
    /// Removes the parcel only while it is `registered`.
    fn delete(&self, number: ParcelNumber) -> RepoResult<usize>;
}

/// SQLite-backed parcel store bound to a caller-owned connection.
#[derive(Clone, Copy)]
pub struct SqliteParcelStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelStore<'conn> {
    /// Binds to `conn` without checking its schema.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Binds to `conn` after verifying the schema version and `parcel` columns.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self::new(conn))
    }
}

impl ParcelRepository for SqliteParcelStore<'_> {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        self.conn.execute(
            "INSERT INTO parcel (client, status, address, created_at)
             VALUES (:client, :status, :address, :created_at);",
            named_params! {
                ":client": parcel.client,
                ":status": parcel.status.as_str(),
                ":address": parcel.address.as_str(),
                ":created_at": parcel.created_at.as_str(),
            },
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE number = :number;"))?;

        let mut rows = stmt.query(named_params! { ":number": number })?;
        if let Some(row) = rows.next()? {
            return parse_parcel_row(row);
        }

        Err(RepoError::NotFound(number))
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PARCEL_SELECT_SQL} WHERE client = :client ORDER BY number ASC;"
        ))?;

        let mut rows = stmt.query(named_params! { ":client": client })?;
        let mut parcels = Vec::new();
        while let Some(row) = rows.next()? {
            parcels.push(parse_parcel_row(row)?);
        }

        Ok(parcels)
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE parcel SET status = :status WHERE number = :number;",
            named_params! {
                ":status": status.as_str(),
                ":number": number,
            },
        )?;
        Ok(changed)
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE parcel
             SET address = :address
             WHERE number = :number AND status = :registered;",
            named_params! {
                ":address": address,
                ":number": number,
                ":registered": ParcelStatus::Registered.as_str(),
            },
        )?;
        Ok(changed)
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM parcel WHERE number = :number AND status = :registered;",
            named_params! {
                ":number": number,
                ":registered": ParcelStatus::Registered.as_str(),
            },
        )?;
        Ok(changed)
    }
}

fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([PARCEL_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;

    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(PARCEL_TABLE));
    }
    if let Some(column) = PARCEL_COLUMNS
        .into_iter()
        .find(|column| !columns.contains(*column))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: PARCEL_TABLE,
            column,
        });
    }

    Ok(())
}

fn parse_parcel_row(row: &Row<'_>) -> RepoResult<Parcel> {
    let status_text: String = row.get(2)?;
    let status = status_text.parse::<ParcelStatus>().map_err(|_| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in parcel.status"))
    })?;

    Ok(Parcel {
        number: row.get(0)?,
        client: row.get(1)?,
        status,
        address: row.get(3)?,
        created_at: row.get(4)?,
    })
}
