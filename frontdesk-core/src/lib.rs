pub mod clock;
pub mod ids;
pub mod payment;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::{IdGenerator, RandomIds, SequentialIds};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Payment provider error: {0}")]
    PaymentError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
