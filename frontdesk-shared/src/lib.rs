pub mod models;
pub mod pii;

pub use models::booking::{Customer, HoldReceipt, Reservation, ReservationStatus, Slot};
