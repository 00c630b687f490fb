//! Parcel domain model.
//!
//! # Responsibility
//! - Define the tracked shipment record and its closed status vocabulary.
//! - Own the status progression used by the tracking use-cases.
//!
//! # Invariants
//! - `number` is assigned by storage and never reused for another parcel.
//! - Only `ParcelStatus::Registered` parcels accept address changes or deletion.
//! - Persisted status text is always one of `registered|sent|delivered`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned parcel identity (SQLite rowid).
pub type ParcelNumber = i64;

/// Opaque reference to an external client.
pub type ClientId = i64;

/// Delivery lifecycle of a parcel.
///
/// Storage imposes no transition graph; `next()` describes the progression
/// followed by the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted for shipping. Address and deletion are still allowed.
    Registered,
    /// Handed over to the carrier.
    Sent,
    /// Received by the client. Terminal.
    Delivered,
}

impl ParcelStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [ParcelStatus; 3] = [Self::Registered, Self::Sent, Self::Delivered];

    /// Returns the canonical storage text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }

    /// Returns the following lifecycle status, or `None` when terminal.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Whether address changes and deletion are permitted in this status.
    pub fn is_mutable(self) -> bool {
        matches!(self, Self::Registered)
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a known [`ParcelStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelStatusParseError {
    value: String,
}

impl ParcelStatusParseError {
    /// The rejected input.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Display for ParcelStatusParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown parcel status `{}`; expected registered|sent|delivered",
            self.value
        )
    }
}

impl Error for ParcelStatusParseError {}

impl FromStr for ParcelStatus {
    type Err = ParcelStatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParcelStatusParseError {
                value: value.to_string(),
            })
    }
}

/// Tracked shipment as stored in the `parcel` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Store-assigned identity. `0` until the parcel has been added.
    pub number: ParcelNumber,
    /// Owning client reference.
    pub client: ClientId,
    /// Current lifecycle status.
    pub status: ParcelStatus,
    /// Free-text delivery address.
    pub address: String,
    /// Caller-supplied creation timestamp, stored verbatim (RFC 3339).
    pub created_at: String,
}

impl Parcel {
    /// Creates an unsaved parcel in `Registered` status.
    pub fn new(client: ClientId, address: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: created_at.into(),
        }
    }

    /// Whether this parcel still accepts address changes and deletion.
    pub fn is_mutable(&self) -> bool {
        self.status.is_mutable()
    }
}

impl Display for Parcel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "parcel {} to `{}` for client {}, registered at {}, status {}",
            self.number, self.address, self.client, self.created_at, self.status
        )
    }
}
