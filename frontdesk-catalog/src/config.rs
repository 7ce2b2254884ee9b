use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Longest slot the catalog will generate.
pub const MAX_SLOT_MINUTES: i64 = 24 * 60;

/// Shape of the bookable window: which days, which start hours, how long.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Consecutive calendar days to generate, starting today
    #[serde(default = "default_days")]
    pub days: u32,

    /// Hour of the first slot start (local to `utc_offset_minutes`)
    #[serde(default = "default_first_start_hour")]
    pub first_start_hour: u32,

    /// Hour of the last slot start, inclusive
    #[serde(default = "default_last_start_hour")]
    pub last_start_hour: u32,

    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: i64,

    /// Offset of the business's wall clock from UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_days() -> u32 { 2 }
fn default_first_start_hour() -> u32 { 9 }
fn default_last_start_hour() -> u32 { 16 }
fn default_slot_minutes() -> i64 { 60 }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            first_start_hour: default_first_start_hour(),
            last_start_hour: default_last_start_hour(),
            slot_minutes: default_slot_minutes(),
            utc_offset_minutes: 0,
        }
    }
}

impl CatalogConfig {
    pub fn offset(&self) -> FixedOffset {
        self.checked_offset().unwrap_or(Utc.fix())
    }

    fn checked_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }

    pub fn validate(&self) -> Result<(), CatalogConfigError> {
        if self.days == 0 {
            return Err(CatalogConfigError::NoDays);
        }
        if self.first_start_hour > 23 || self.last_start_hour > 23 {
            return Err(CatalogConfigError::HourOutOfRange {
                first: self.first_start_hour,
                last: self.last_start_hour,
            });
        }
        if self.first_start_hour > self.last_start_hour {
            return Err(CatalogConfigError::EmptyDay {
                first: self.first_start_hour,
                last: self.last_start_hour,
            });
        }
        if self.slot_minutes <= 0 || self.slot_minutes > MAX_SLOT_MINUTES {
            return Err(CatalogConfigError::InvalidDuration(self.slot_minutes));
        }
        if self.checked_offset().is_none() {
            return Err(CatalogConfigError::InvalidOffset(self.utc_offset_minutes));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogConfigError {
    #[error("Catalog must cover at least one day")]
    NoDays,

    #[error("Start hours must be within 0..=23 (got {first}..={last})")]
    HourOutOfRange { first: u32, last: u32 },

    #[error("First start hour {first} is after last start hour {last}")]
    EmptyDay { first: u32, last: u32 },

    #[error("Slot duration must be between 1 and 1440 minutes (got {0})")]
    InvalidDuration(i64),

    #[error("UTC offset out of range: {0} minutes")]
    InvalidOffset(i32),
}
