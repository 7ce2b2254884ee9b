pub mod config;
pub mod slots;

pub use config::{CatalogConfig, CatalogConfigError, MAX_SLOT_MINUTES};
pub use slots::SlotCatalog;
