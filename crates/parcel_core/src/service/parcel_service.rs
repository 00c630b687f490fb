//! Parcel tracking use-case service.
//!
//! # Responsibility
//! - Provide registration, progression and correction entry points.
//! - Turn silently rejected gated mutations into explicit errors.
//!
//! # Invariants
//! - Gated mutations stay single statements in the repository; the follow-up
//!   read only classifies a rejection and never retries it.
//! - Log lines carry metadata only (numbers, clients, statuses), never addresses.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_repo::{ParcelRepository, RepoError, RepoResult};
use log::{debug, info, warn};
use time::OffsetDateTime;

/// Use-case service wrapper for parcel tracking.
pub struct ParcelService<R: ParcelRepository> {
    repo: R,
}

impl<R: ParcelRepository> ParcelService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new parcel stamped with the current UTC time.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> RepoResult<Parcel> {
        self.register_at(client, address, current_timestamp())
    }

    /// Registers a new parcel with a caller-supplied creation timestamp.
    ///
    /// # Contract
    /// - Status starts as `registered`.
    /// - Returns the stored parcel with its assigned number.
    pub fn register_at(
        &self,
        client: ClientId,
        address: impl Into<String>,
        created_at: impl Into<String>,
    ) -> RepoResult<Parcel> {
        let mut parcel = Parcel::new(client, address, created_at);
        parcel.number = self.repo.add(&parcel)?;
        info!(
            "event=parcel_register module=service status=ok number={} client={}",
            parcel.number, parcel.client
        );
        Ok(parcel)
    }

    /// Gets one parcel by number.
    pub fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        self.repo.get(number)
    }

    /// Lists every parcel of a client.
    pub fn parcels_of(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        self.repo.get_by_client(client)
    }

    /// Advances a parcel one step along `registered -> sent -> delivered`.
    ///
    /// Delivered parcels are left untouched. Returns the resulting status.
    pub fn next_status(&self, number: ParcelNumber) -> RepoResult<ParcelStatus> {
        let current = self.repo.get(number)?.status;
        let Some(next) = current.next() else {
            debug!(
                "event=parcel_next_status module=service status=skipped number={number} reason=terminal"
            );
            return Ok(current);
        };

        self.repo.set_status(number, next)?;
        info!(
            "event=parcel_next_status module=service status=ok number={number} from={current} to={next}"
        );
        Ok(next)
    }

    /// Changes the delivery address of a `registered` parcel.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when the parcel does not exist.
    /// - `RepoError::PreconditionFailed` when the parcel is past `registered`.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        if self.repo.set_address(number, address)? == 0 {
            return Err(self.rejection("parcel_change_address", number));
        }
        info!("event=parcel_change_address module=service status=ok number={number}");
        Ok(())
    }

    /// Deletes a `registered` parcel.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when the parcel does not exist.
    /// - `RepoError::PreconditionFailed` when the parcel is past `registered`.
    pub fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        if self.repo.delete(number)? == 0 {
            return Err(self.rejection("parcel_delete", number));
        }
        info!("event=parcel_delete module=service status=ok number={number}");
        Ok(())
    }

    fn rejection(&self, event: &str, number: ParcelNumber) -> RepoError {
        let err = match self.repo.get(number) {
            Ok(parcel) => RepoError::PreconditionFailed {
                number,
                status: parcel.status,
            },
            Err(err) => err,
        };
        warn!("event={event} module=service status=rejected number={number} error={err}");
        err
    }
}

/// Current UTC time as RFC 3339 with whole seconds, e.g. `2024-01-01T00:00:00Z`.
fn current_timestamp() -> String {
    rfc3339_seconds(OffsetDateTime::now_utc())
}

fn rfc3339_seconds(at: OffsetDateTime) -> String {
    let utc = at.to_offset(time::UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second()
    )
}
