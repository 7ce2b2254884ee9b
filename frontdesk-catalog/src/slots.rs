use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone, Utc};
use frontdesk_core::{Clock, IdGenerator};
use frontdesk_shared::Slot;
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::CatalogConfig;

/// The fixed universe of bookable slots, generated once and read-only after.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    config: CatalogConfig,
    slots: Vec<Slot>,
    index: HashMap<Uuid, usize>,
}

impl SlotCatalog {
    /// Generate slots for `config.days` days starting at `first_day`.
    /// Ids are drawn from `ids` in chronological order. A slot length that
    /// chrono cannot represent yields an empty catalog.
    pub fn generate(config: CatalogConfig, first_day: NaiveDate, ids: &dyn IdGenerator) -> Self {
        let offset = config.offset();
        let Some(duration) = Duration::try_minutes(config.slot_minutes) else {
            return Self {
                config,
                slots: Vec::new(),
                index: HashMap::new(),
            };
        };

        let mut slots = Vec::new();
        for day in 0..config.days {
            let Some(date) = first_day.checked_add_days(Days::new(day as u64)) else {
                break;
            };
            for hour in config.first_start_hour..=config.last_start_hour {
                let Some(local) = date.and_hms_opt(hour, 0, 0) else {
                    continue;
                };
                let Some(start) = offset.from_local_datetime(&local).single() else {
                    continue;
                };
                let start = start.with_timezone(&Utc);
                let Some(end) = start.checked_add_signed(duration) else {
                    continue;
                };
                slots.push(Slot {
                    id: ids.next_id(),
                    start,
                    end,
                });
            }
        }
        slots.sort_by_key(|slot| slot.start);

        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.id, i))
            .collect();

        Self { config, slots, index }
    }

    /// Generate starting from the current calendar day in the configured offset.
    pub fn for_today(config: CatalogConfig, clock: &dyn Clock, ids: &dyn IdGenerator) -> Self {
        let today = clock.now().with_timezone(&config.offset()).date_naive();
        Self::generate(config, today, ids)
    }

    /// All slots, chronological.
    pub fn all_slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn find(&self, slot_id: &Uuid) -> Option<&Slot> {
        self.index.get(slot_id).map(|&i| &self.slots[i])
    }

    pub fn contains(&self, slot_id: &Uuid) -> bool {
        self.index.contains_key(slot_id)
    }

    /// Calendar date a slot starts on, on the business's wall clock.
    pub fn local_date(&self, slot: &Slot) -> NaiveDate {
        self.local_date_of(slot.start)
    }

    fn local_date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.config.offset()).date_naive()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
