//! Core domain logic for the parcel tracker.
//! This crate owns parcel persistence and its status-gated mutation rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus, ParcelStatusParseError};
pub use repo::parcel_repo::{ParcelRepository, RepoError, RepoResult, SqliteParcelStore};
pub use service::parcel_service::ParcelService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
