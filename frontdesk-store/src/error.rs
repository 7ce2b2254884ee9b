use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReservationError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl ReservationError {
    pub(crate) fn unknown_slot(slot_id: &Uuid) -> Self {
        Self::NotFound(format!("slot {}", slot_id))
    }

    pub(crate) fn unknown_appointment(appointment_id: &Uuid) -> Self {
        Self::NotFound(format!("appointment {}", appointment_id))
    }

    pub(crate) fn slot_taken(slot_id: &Uuid) -> Self {
        Self::Conflict(format!("slot {} is no longer available", slot_id))
    }
}
