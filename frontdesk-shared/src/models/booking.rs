use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pii::Masked;

/// A bookable time window. Immutable once generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Contact details attached to a hold. Presence of `name` and `phone` is
/// checked at the HTTP boundary, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub phone: Masked<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Masked<String>>,
}

impl Customer {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: Masked(phone.into()),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(Masked(email.into()));
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Held,
    Booked,
}

/// A hold or confirmed booking against a single slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub appointment_id: Uuid,
    pub slot_id: Uuid,
    pub customer: Customer,
    pub status: ReservationStatus,
    pub hold_expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

impl Reservation {
    /// A held reservation lapses once `now` reaches its expiry.
    /// Booked reservations never lapse.
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Held && self.hold_expires_at <= now
    }

    pub fn is_booked(&self) -> bool {
        self.status == ReservationStatus::Booked
    }
}

/// What `create_hold` hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HoldReceipt {
    pub appointment_id: Uuid,
    pub hold_expires_at: DateTime<Utc>,
}
