pub mod app_config;
pub mod error;
pub mod reservations;

pub use error::ReservationError;
pub use reservations::{Confirmation, ReservationStore, DEFAULT_HOLD_MINUTES};
