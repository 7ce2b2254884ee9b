//! The slot/hold reservation state machine.
//!
//! A reservation is created `Held`, becomes `Booked` on confirmation, or
//! lapses once its hold expiry passes. Lapsed holds are evicted lazily at the
//! start of every operation (and by [`ReservationStore::purge_expired`] when a
//! sweeper is running). Every operation runs its purge, check and write under
//! one store-wide lock, so two holds on the same slot can never both succeed.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use frontdesk_catalog::SlotCatalog;
use frontdesk_core::{Clock, IdGenerator, RandomIds, SystemClock};
use frontdesk_shared::{Customer, HoldReceipt, Reservation, ReservationStatus, Slot};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ReservationError;

pub const DEFAULT_HOLD_MINUTES: i64 = 15;

/// Outcome of a successful `confirm_hold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The hold was promoted to a booking by this call
    Confirmed,
    /// The appointment was already booked; nothing changed
    AlreadyBooked,
}

#[derive(Debug, Default)]
struct Reservations {
    by_id: HashMap<Uuid, Reservation>,
    /// slot id -> appointment id of the reservation occupying it
    by_slot: HashMap<Uuid, Uuid>,
}

impl Reservations {
    fn purge(&mut self, now: DateTime<Utc>) -> usize {
        let lapsed: Vec<Uuid> = self
            .by_id
            .values()
            .filter(|r| r.is_lapsed(now))
            .map(|r| r.appointment_id)
            .collect();

        for appointment_id in &lapsed {
            if let Some(reservation) = self.by_id.remove(appointment_id) {
                self.by_slot.remove(&reservation.slot_id);
            }
        }

        lapsed.len()
    }
}

pub struct ReservationStore {
    catalog: SlotCatalog,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    hold_duration: Duration,
    state: Mutex<Reservations>,
}

impl ReservationStore {
    pub fn new(
        catalog: SlotCatalog,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        hold_duration: Duration,
    ) -> Self {
        Self {
            catalog,
            clock,
            ids,
            hold_duration,
            state: Mutex::new(Reservations::default()),
        }
    }

    /// Wall clock, random ids, 15-minute holds.
    pub fn with_defaults(catalog: SlotCatalog) -> Self {
        Self::new(
            catalog,
            Arc::new(SystemClock),
            Arc::new(RandomIds),
            Duration::minutes(DEFAULT_HOLD_MINUTES),
        )
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Slots with no live hold and no booking, in catalog order, optionally
    /// restricted to slots starting on `date`.
    pub fn list_open_slots(&self, date: Option<NaiveDate>) -> Vec<Slot> {
        let mut state = self.lock();
        state.purge(self.clock.now());

        self.catalog
            .all_slots()
            .iter()
            .filter(|slot| !state.by_slot.contains_key(&slot.id))
            .filter(|slot| date.map_or(true, |d| self.catalog.local_date(slot) == d))
            .cloned()
            .collect()
    }

    /// Place a hold on `slot_id` for `customer`.
    pub fn create_hold(
        &self,
        slot_id: Uuid,
        customer: Customer,
    ) -> Result<HoldReceipt, ReservationError> {
        let mut state = self.lock();
        let now = self.clock.now();
        state.purge(now);

        if !self.catalog.contains(&slot_id) {
            return Err(ReservationError::unknown_slot(&slot_id));
        }

        if let Some(holder) = state.by_slot.get(&slot_id) {
            warn!("Slot {} already reserved by appointment {}", slot_id, holder);
            return Err(ReservationError::slot_taken(&slot_id));
        }

        let appointment_id = self.ids.next_id();
        let hold_expires_at = now + self.hold_duration;

        state.by_slot.insert(slot_id, appointment_id);
        state.by_id.insert(
            appointment_id,
            Reservation {
                appointment_id,
                slot_id,
                customer,
                status: ReservationStatus::Held,
                hold_expires_at,
                payment_id: None,
            },
        );

        info!("Hold created: {} on slot {} until {}", appointment_id, slot_id, hold_expires_at);

        Ok(HoldReceipt {
            appointment_id,
            hold_expires_at,
        })
    }

    /// Promote a live hold to a booking. Confirming an already booked
    /// appointment succeeds without touching it, so the payment webhook and
    /// the redirect path can both confirm the same appointment.
    pub fn confirm_hold(
        &self,
        appointment_id: &Uuid,
        payment_id: Option<String>,
    ) -> Result<Confirmation, ReservationError> {
        let mut state = self.lock();
        state.purge(self.clock.now());

        let reservation = state
            .by_id
            .get_mut(appointment_id)
            .ok_or_else(|| ReservationError::unknown_appointment(appointment_id))?;

        if reservation.is_booked() {
            debug!("Appointment {} already booked", appointment_id);
            return Ok(Confirmation::AlreadyBooked);
        }

        reservation.status = ReservationStatus::Booked;
        if payment_id.is_some() {
            reservation.payment_id = payment_id;
        }

        info!("Appointment {} booked (slot {})", appointment_id, reservation.slot_id);
        Ok(Confirmation::Confirmed)
    }

    /// Look up a reservation in any status. Lapsed holds are gone.
    pub fn get_hold(&self, appointment_id: &Uuid) -> Option<Reservation> {
        let mut state = self.lock();
        state.purge(self.clock.now());
        state.by_id.get(appointment_id).cloned()
    }

    /// Evict every lapsed hold now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut state = self.lock();
        let purged = state.purge(self.clock.now());
        if purged > 0 {
            debug!("Purged {} expired holds", purged);
        }
        purged
    }

    fn lock(&self) -> MutexGuard<'_, Reservations> {
        // Every write leaves the maps consistent, so a poisoned guard is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
