//! Domain model for tracked parcels.
//!
//! # Responsibility
//! - Define the data structures shared by storage and use-case layers.
//!
//! # Invariants
//! - Every parcel is identified by a store-assigned `ParcelNumber`.
//! - Deletion is physical removal; there are no tombstones.

pub mod parcel;
